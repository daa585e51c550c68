//! Statistics and link stores.
//!
//! The file-backed stores keep JSON Lines logs on a [`Storage`]; records are
//! only ever appended. The in-memory stores serve one-off runs and tests.

use crate::domain::model::{ImportStatistics, Link, LinkSource};
use crate::domain::ports::{LinkStore, StatisticsStore, Storage};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

pub const STATISTICS_FILE: &str = "import_statistics.jsonl";
pub const LINKS_FILE: &str = "links.jsonl";

/// Latest record by `dt`; on equal `dt` the one appended last wins.
fn latest_for<'a, I>(records: I, source: LinkSource) -> Option<&'a ImportStatistics>
where
    I: IntoIterator<Item = &'a ImportStatistics>,
{
    records
        .into_iter()
        .filter(|s| s.source == source)
        .fold(None, |best: Option<&ImportStatistics>, s| match best {
            Some(b) if b.dt > s.dt => Some(b),
            _ => Some(s),
        })
}

fn to_json_lines<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for item in items {
        serde_json::to_writer(&mut buf, item)?;
        buf.push(b'\n');
    }
    Ok(buf)
}

fn from_json_lines<T: DeserializeOwned>(path: &str, data: &[u8]) -> Result<Vec<T>> {
    let text = std::str::from_utf8(data).map_err(|e| ImportError::Storage {
        message: format!("{path} is not valid UTF-8: {e}"),
    })?;

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| ImportError::Storage {
                message: format!("{path}:{}: {e}", n + 1),
            })
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct InMemoryStatisticsStore {
    records: Mutex<Vec<ImportStatistics>>,
}

impl InMemoryStatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<ImportStatistics> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl StatisticsStore for InMemoryStatisticsStore {
    async fn get_last_by_source(&self, source: LinkSource) -> Result<Option<ImportStatistics>> {
        let records = self.records.lock().await;
        Ok(latest_for(records.iter(), source).cloned())
    }

    async fn insert(&self, statistics: &ImportStatistics) -> Result<()> {
        self.records.lock().await.push(statistics.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    links: Mutex<Vec<Link>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Link> {
        self.links.lock().await.clone()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert_many(&self, links: &[Link]) -> Result<()> {
        self.links.lock().await.extend_from_slice(links);
        Ok(())
    }
}

pub struct FileStatisticsStore<S: Storage> {
    storage: S,
}

impl<S: Storage> FileStatisticsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn all(&self) -> Result<Vec<ImportStatistics>> {
        match self.storage.read_file(STATISTICS_FILE).await? {
            Some(data) => from_json_lines(STATISTICS_FILE, &data),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<S: Storage> StatisticsStore for FileStatisticsStore<S> {
    async fn get_last_by_source(&self, source: LinkSource) -> Result<Option<ImportStatistics>> {
        let records = self.all().await?;
        Ok(latest_for(records.iter(), source).cloned())
    }

    async fn insert(&self, statistics: &ImportStatistics) -> Result<()> {
        let line = to_json_lines(std::slice::from_ref(statistics))?;
        self.storage.append_file(STATISTICS_FILE, &line).await?;
        tracing::debug!(source = %statistics.source, dt = %statistics.dt, "Appended import statistics");
        Ok(())
    }
}

pub struct FileLinkStore<S: Storage> {
    storage: S,
}

impl<S: Storage> FileLinkStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn all(&self) -> Result<Vec<Link>> {
        match self.storage.read_file(LINKS_FILE).await? {
            Some(data) => from_json_lines(LINKS_FILE, &data),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<S: Storage> LinkStore for FileLinkStore<S> {
    async fn insert_many(&self, links: &[Link]) -> Result<()> {
        if links.is_empty() {
            return Ok(());
        }
        let data = to_json_lines(links)?;
        self.storage.append_file(LINKS_FILE, &data).await?;
        tracing::debug!(count = links.len(), "Appended links");
        Ok(())
    }
}
