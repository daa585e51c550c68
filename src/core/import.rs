use crate::core::statistics::RunTimeStatisticsBuilder;
use crate::domain::model::{ImportLinksRequest, ImportStatistics, LinkSource};
use crate::domain::ports::{
    LinkProvider, LinkStore, NotificationService, StatisticsBuilder, StatisticsStore,
};
use crate::utils::error::Result;
use std::sync::Arc;

/// Runs one incremental import cycle for a single link provider.
///
/// Every step awaits the previous one. Two engines running at the same time
/// against the same source and statistics store race: the later insert wins
/// as the next checkpoint.
pub struct ImportEngine {
    link_provider: Arc<dyn LinkProvider>,
    statistics_store: Arc<dyn StatisticsStore>,
    link_store: Arc<dyn LinkStore>,
    notifier: Arc<dyn NotificationService>,
    statistics_builder: Box<dyn StatisticsBuilder>,
}

impl ImportEngine {
    pub fn new(
        link_provider: Arc<dyn LinkProvider>,
        statistics_store: Arc<dyn StatisticsStore>,
        link_store: Arc<dyn LinkStore>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            link_provider,
            statistics_store,
            link_store,
            notifier,
            statistics_builder: Box::new(RunTimeStatisticsBuilder::new()),
        }
    }

    /// Replace the step that turns a fetched batch into a statistics record.
    pub fn with_statistics_builder(mut self, builder: impl StatisticsBuilder + 'static) -> Self {
        self.statistics_builder = Box::new(builder);
        self
    }

    pub fn source(&self) -> LinkSource {
        self.link_provider.get_source()
    }

    /// The checkpoint the next `execute` would fetch from.
    pub async fn checkpoint(&self) -> Result<Option<ImportStatistics>> {
        self.statistics_store
            .get_last_by_source(self.link_provider.get_source())
            .await
    }

    pub async fn execute(&self, request: &ImportLinksRequest) -> Result<ImportStatistics> {
        let source = self.link_provider.get_source();
        tracing::info!(%source, "📥 Starting link import");

        let last = self.statistics_store.get_last_by_source(source).await?;
        let since = last.as_ref().map(|s| s.dt);
        match since {
            Some(dt) => tracing::debug!(%source, since = %dt, "Fetching links newer than checkpoint"),
            None => tracing::debug!(%source, "No checkpoint yet, fetching all links"),
        }

        let links = self.link_provider.get_links(since).await?;
        tracing::info!(%source, fetched = links.len(), "Fetched links");

        self.link_store.insert_many(&links).await?;

        let statistics = self.statistics_builder.prepare_statistics(source, &links);
        self.statistics_store.insert(&statistics).await?;
        tracing::info!(
            %source,
            imported = statistics.links_count,
            checkpoint = %statistics.dt,
            "✅ Import recorded"
        );

        if request.send_results {
            self.notifier
                .send_import_result_notification(&statistics)
                .await?;
            tracing::debug!(%source, "Import result notification sent");
        }

        Ok(statistics)
    }
}
