use crate::utils::error::ImportError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identity of an external link feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkSource {
    Pocket,
    Custom,
    Rss,
}

impl LinkSource {
    pub const ALL: [LinkSource; 3] = [LinkSource::Pocket, LinkSource::Custom, LinkSource::Rss];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkSource::Pocket => "POCKET",
            LinkSource::Custom => "CUSTOM",
            LinkSource::Rss => "RSS",
        }
    }
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkSource {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImportError::InvalidConfigValue {
                field: "source".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown link source. Known sources: {}",
                    LinkSource::ALL.map(|s| s.as_str()).join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: LinkSource,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Summary of one import run. `dt` is the checkpoint the next run for the
/// same source fetches from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStatistics {
    pub source: LinkSource,
    pub dt: DateTime<Utc>,
    pub links_count: usize,
    #[serde(default)]
    pub link_ids: Vec<String>,
}

impl ImportStatistics {
    pub fn new(source: LinkSource, dt: DateTime<Utc>, links: &[Link]) -> Self {
        Self {
            source,
            dt,
            links_count: links.len(),
            link_ids: links.iter().map(|l| l.external_id.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLinksRequest {
    #[serde(default)]
    pub send_results: bool,
}

impl ImportLinksRequest {
    pub fn with_results() -> Self {
        Self { send_results: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn link_source_parses_case_insensitively() {
        assert_eq!("pocket".parse::<LinkSource>().unwrap(), LinkSource::Pocket);
        assert_eq!(" CUSTOM ".parse::<LinkSource>().unwrap(), LinkSource::Custom);
        assert!("delicious".parse::<LinkSource>().is_err());
    }

    #[test]
    fn link_source_serializes_as_upper_case_name() {
        let json = serde_json::to_string(&LinkSource::Rss).unwrap();
        assert_eq!(json, "\"RSS\"");
    }

    #[test]
    fn statistics_capture_batch_ids_in_order() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let links: Vec<Link> = ["b", "a"]
            .iter()
            .map(|id| Link {
                source: LinkSource::Custom,
                external_id: id.to_string(),
                created_at: dt,
                title: None,
                url: format!("https://example.com/{id}"),
                metadata: HashMap::new(),
            })
            .collect();

        let stats = ImportStatistics::new(LinkSource::Custom, dt, &links);
        assert_eq!(stats.links_count, 2);
        assert_eq!(stats.link_ids, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn default_request_does_not_send_results() {
        assert!(!ImportLinksRequest::default().send_results);
        assert!(ImportLinksRequest::with_results().send_results);
    }
}
