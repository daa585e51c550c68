use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Link source {endpoint} answered with HTTP {status}")]
    SourceResponse { status: u16, endpoint: String },

    #[error("Invalid link payload: {message}")]
    InvalidPayload { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Notification failed: {message}")]
    Notification { message: String },
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::Http(_) | ImportError::SourceResponse { .. } => ErrorCategory::Network,
            ImportError::Config { .. }
            | ImportError::MissingConfig { .. }
            | ImportError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            ImportError::Serialization(_) | ImportError::InvalidPayload { .. } => {
                ErrorCategory::Data
            }
            ImportError::Io(_) | ImportError::Storage { .. } => ErrorCategory::Storage,
            ImportError::Notification { .. } => ErrorCategory::Notification,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // statistics are already stored when a notification fails
            ImportError::Notification { .. } => ErrorSeverity::Low,
            ImportError::Http(_) | ImportError::SourceResponse { .. } => ErrorSeverity::Medium,
            ImportError::Serialization(_) | ImportError::InvalidPayload { .. } => {
                ErrorSeverity::High
            }
            ImportError::Config { .. }
            | ImportError::MissingConfig { .. }
            | ImportError::InvalidConfigValue { .. } => ErrorSeverity::High,
            ImportError::Io(_) | ImportError::Storage { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check connectivity and credentials for the link source, then re-run; the checkpoint was not advanced"
            }
            ErrorCategory::Configuration => "Fix the configuration file and re-run",
            ErrorCategory::Data => {
                "Inspect the source response or the stored statistics log for malformed entries"
            }
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Notification => {
                "The import itself succeeded; check the notification endpoint"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::Http(e) if e.is_timeout() => {
                "The link source did not answer in time".to_string()
            }
            ImportError::Http(_) => "Could not reach the link source".to_string(),
            ImportError::SourceResponse { status, .. } => {
                format!("The link source rejected the request (HTTP {status})")
            }
            ImportError::MissingConfig { field } => {
                format!("Configuration is missing '{field}'")
            }
            ImportError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value '{field}' is invalid: {reason}")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_failures_are_low_severity() {
        let err = ImportError::Notification {
            message: "webhook down".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Notification);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn source_status_is_reported_to_the_user() {
        let err = ImportError::SourceResponse {
            status: 503,
            endpoint: "https://example.com/links".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("503"));
    }
}
