use crate::domain::model::ImportStatistics;
use crate::domain::ports::NotificationService;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Upper bound for webhook retries, from config or the builder.
pub const MAX_WEBHOOK_RETRIES: u8 = 10;

pub fn summary_text(statistics: &ImportStatistics) -> String {
    format!(
        "Imported {} new link(s) from {} (checkpoint {})",
        statistics.links_count,
        statistics.source,
        statistics.dt.to_rfc3339()
    )
}

/// Used when notifications are switched off in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl NotificationService for NoopNotifier {
    async fn send_import_result_notification(&self, statistics: &ImportStatistics) -> Result<()> {
        tracing::debug!(source = %statistics.source, "Notifications disabled, result not sent");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationService for LogNotifier {
    async fn send_import_result_notification(&self, statistics: &ImportStatistics) -> Result<()> {
        tracing::info!(
            source = %statistics.source,
            imported = statistics.links_count,
            checkpoint = %statistics.dt,
            "📬 {}",
            summary_text(statistics)
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: String,
    statistics: &'a ImportStatistics,
}

/// Posts the run summary as JSON. Retries with exponential backoff and
/// reports failure once the retries are used up.
#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
    backoff_base: Duration,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.min(MAX_WEBHOOK_RETRIES);
        self
    }

    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    async fn post_once(&self, payload: &WebhookPayload<'_>) -> std::result::Result<(), String> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| format!("HTTP error: {e}"))
    }
}

/// `base * 2^(attempt - 1)`, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

#[async_trait]
impl NotificationService for WebhookNotifier {
    async fn send_import_result_notification(&self, statistics: &ImportStatistics) -> Result<()> {
        let payload = WebhookPayload {
            text: summary_text(statistics),
            statistics,
        };

        let attempts = u32::from(self.max_retries) + 1;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.post_once(&payload).await {
                Ok(()) => return Ok(()),
                Err(reason) if attempt < attempts => {
                    let delay = backoff_delay(self.backoff_base, attempt);
                    tracing::warn!(attempt, %reason, ?delay, "Webhook notification failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(reason) => {
                    return Err(ImportError::Notification {
                        message: format!("{} after {attempt} attempt(s): {reason}", self.url),
                    });
                }
            }
        }
    }
}
