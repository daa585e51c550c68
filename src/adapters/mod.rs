// Adapters layer: concrete implementations of the domain ports (http source,
// file and in-memory stores, notifiers).

pub mod http;
pub mod notify;
pub mod storage;
pub mod stores;

pub use http::HttpLinkProvider;
pub use notify::{LogNotifier, NoopNotifier, WebhookNotifier};
pub use storage::LocalStorage;
pub use stores::{FileLinkStore, FileStatisticsStore, InMemoryLinkStore, InMemoryStatisticsStore};
