use crate::adapters::{
    FileLinkStore, FileStatisticsStore, HttpLinkProvider, InMemoryLinkStore,
    InMemoryStatisticsStore, LocalStorage, LogNotifier, NoopNotifier, WebhookNotifier,
};
use crate::config::toml_config::{ImportConfig, NotificationKind, StorageBackend};
use crate::core::import::ImportEngine;
use crate::core::runner::ImportRunner;
use crate::domain::model::LinkSource;
use crate::domain::ports::{LinkStore, NotificationService, StatisticsStore};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

pub struct Stores {
    pub statistics: Arc<dyn StatisticsStore>,
    pub links: Arc<dyn LinkStore>,
}

pub fn build_stores(config: &ImportConfig) -> Stores {
    match config.storage.backend {
        StorageBackend::File => {
            let storage = LocalStorage::new(&config.storage.data_dir);
            Stores {
                statistics: Arc::new(FileStatisticsStore::new(storage.clone())),
                links: Arc::new(FileLinkStore::new(storage)),
            }
        }
        StorageBackend::Memory => Stores {
            statistics: Arc::new(InMemoryStatisticsStore::new()),
            links: Arc::new(InMemoryLinkStore::new()),
        },
    }
}

pub fn build_notifier(config: &ImportConfig) -> Result<Arc<dyn NotificationService>> {
    let notification = &config.notification;
    let notifier: Arc<dyn NotificationService> = match notification.kind {
        NotificationKind::None => Arc::new(NoopNotifier),
        NotificationKind::Log => Arc::new(LogNotifier),
        NotificationKind::Webhook => {
            let url = validate_required_field("notification.webhook_url", &notification.webhook_url)?;
            Arc::new(
                WebhookNotifier::new(url.clone())
                    .with_timeout(notification.timeout_seconds())
                    .with_retries(notification.max_retries()),
            )
        }
    };
    Ok(notifier)
}

/// One engine per configured source, all sharing the same stores and
/// notifier. `only` restricts the run to a single source.
pub fn build_runner(config: &ImportConfig, only: Option<LinkSource>) -> Result<ImportRunner> {
    let stores = build_stores(config);
    let notifier = build_notifier(config)?;

    let engines: Vec<ImportEngine> = config
        .sources
        .iter()
        .filter(|s| only.map_or(true, |kind| s.kind == kind))
        .map(|source| {
            ImportEngine::new(
                Arc::new(HttpLinkProvider::new(source.clone())),
                Arc::clone(&stores.statistics),
                Arc::clone(&stores.links),
                Arc::clone(&notifier),
            )
        })
        .collect();

    if engines.is_empty() {
        return Err(ImportError::Config {
            message: match only {
                Some(kind) => format!("source {kind} is not configured"),
                None => "no sources configured".to_string(),
            },
        });
    }

    Ok(ImportRunner::new(engines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[storage]
backend = "memory"

[notification]
kind = "none"

[[sources]]
kind = "POCKET"
endpoint = "https://getpocket.example.com/v3/get"

[[sources]]
kind = "RSS"
endpoint = "https://feeds.example.com/links.json"
"#;

    #[test]
    fn builds_one_engine_per_source() {
        let config = ImportConfig::from_toml_str(CONFIG).unwrap();
        let runner = build_runner(&config, None).unwrap();
        assert_eq!(runner.sources(), vec![LinkSource::Pocket, LinkSource::Rss]);
    }

    #[test]
    fn filters_to_a_single_source() {
        let config = ImportConfig::from_toml_str(CONFIG).unwrap();
        let runner = build_runner(&config, Some(LinkSource::Rss)).unwrap();
        assert_eq!(runner.sources(), vec![LinkSource::Rss]);
    }

    #[test]
    fn unknown_filter_is_a_config_error() {
        let config = ImportConfig::from_toml_str(CONFIG).unwrap();
        let err = build_runner(&config, Some(LinkSource::Custom)).err().unwrap();
        assert!(matches!(err, ImportError::Config { .. }));
    }

    #[test]
    fn webhook_without_url_is_rejected() {
        let mut config = ImportConfig::from_toml_str(CONFIG).unwrap();
        config.notification.kind = NotificationKind::Webhook;
        assert!(build_notifier(&config).is_err());
    }
}
