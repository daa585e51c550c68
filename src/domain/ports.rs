use crate::domain::model::{ImportStatistics, Link, LinkSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Byte-level storage used by the file-backed stores.
pub trait Storage: Send + Sync {
    /// `Ok(None)` when the file does not exist yet.
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait LinkProvider: Send + Sync {
    fn get_source(&self) -> LinkSource;

    /// Links strictly newer than `since`, or everything available when `None`.
    async fn get_links(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Link>>;
}

#[async_trait]
pub trait StatisticsStore: Send + Sync {
    /// Most recent record by `dt` for `source`.
    async fn get_last_by_source(&self, source: LinkSource) -> Result<Option<ImportStatistics>>;

    /// Append-only.
    async fn insert(&self, statistics: &ImportStatistics) -> Result<()>;
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn insert_many(&self, links: &[Link]) -> Result<()>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_import_result_notification(&self, statistics: &ImportStatistics) -> Result<()>;
}

pub trait StatisticsBuilder: Send + Sync {
    fn prepare_statistics(&self, source: LinkSource, links: &[Link]) -> ImportStatistics;
}
