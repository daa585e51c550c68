pub mod wiring;

pub use wiring::{build_notifier, build_runner, build_stores, Stores};
