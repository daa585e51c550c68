use crate::adapters::notify::MAX_WEBHOOK_RETRIES;
use crate::domain::model::{ImportLinksRequest, LinkSource};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{
    validate_http_url, validate_path, validate_range, validate_required_field, validate_unique,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 20;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 5;
const DEFAULT_WEBHOOK_RETRIES: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSection {
    #[serde(default)]
    pub send_results: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    None,
    #[default]
    Log,
    Webhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub kind: NotificationKind,
    pub webhook_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u8>,
}

impl NotificationConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_SECS)
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries.unwrap_or(DEFAULT_WEBHOOK_RETRIES)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Keys of the source payload that feed the `Link` fields. Every other key
/// of an item ends up in `Link::metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub id: String,
    pub url: String,
    pub title: String,
    pub created_at: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            url: "url".to_string(),
            title: "title".to_string(),
            created_at: "created_at".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: LinkSource,
    pub endpoint: String,
    pub since_param: Option<String>,
    /// Key of the item array when the endpoint wraps it in an object.
    pub items_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub field_mapping: FieldMapping,
}

impl SourceConfig {
    pub fn new(kind: LinkSource, endpoint: impl Into<String>) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            since_param: None,
            items_key: None,
            timeout_seconds: None,
            headers: None,
            parameters: None,
            field_mapping: FieldMapping::default(),
        }
    }

    pub fn since_param(&self) -> &str {
        self.since_param.as_deref().unwrap_or("since")
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_SOURCE_TIMEOUT_SECS)
    }
}

impl ImportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses after replacing `${VAR}` with the environment value. Unset
    /// variables are left as written so validation can point at them.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| ImportError::Config {
            message: format!("TOML parsing error: {e}"),
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::Config {
            message: format!("env substitution pattern: {e}"),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{var_name}}}"))
        });

        Ok(result.into_owned())
    }

    pub fn request(&self) -> ImportLinksRequest {
        ImportLinksRequest {
            send_results: self.import.send_results,
        }
    }

    pub fn source(&self, kind: LinkSource) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.kind == kind)
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ImportError::MissingConfig {
                field: "sources".to_string(),
            });
        }
        validate_unique("sources.kind", self.sources.iter().map(|s| s.kind))?;

        for source in &self.sources {
            validate_http_url("sources.endpoint", &source.endpoint)?;
            validate_range("sources.timeout_seconds", source.timeout_seconds(), 1, 300)?;
        }

        if self.storage.backend == StorageBackend::File {
            validate_path("storage.data_dir", &self.storage.data_dir)?;
        }

        if self.notification.kind == NotificationKind::Webhook {
            let url =
                validate_required_field("notification.webhook_url", &self.notification.webhook_url)?;
            validate_http_url("notification.webhook_url", url)?;
            validate_range(
                "notification.timeout_seconds",
                self.notification.timeout_seconds(),
                1,
                300,
            )?;
            validate_range(
                "notification.max_retries",
                self.notification.max_retries(),
                0,
                MAX_WEBHOOK_RETRIES,
            )?;
        }

        Ok(())
    }
}
