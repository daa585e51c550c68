use crate::config::toml_config::{FieldMapping, SourceConfig};
use crate::domain::model::{Link, LinkSource};
use crate::domain::ports::LinkProvider;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

/// Pulls links from a JSON HTTP endpoint.
pub struct HttpLinkProvider {
    config: SourceConfig,
    client: Client,
}

impl HttpLinkProvider {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn items(&self, body: Value) -> Result<Vec<Value>> {
        let body = match &self.config.items_key {
            Some(key) => match body {
                Value::Object(mut obj) => obj.remove(key).unwrap_or(Value::Null),
                _ => Value::Null,
            },
            None => body,
        };

        match body {
            Value::Array(items) => Ok(items),
            // Pocket-style payloads key items by id
            Value::Object(obj) => Ok(obj.into_iter().map(|(_, v)| v).collect()),
            Value::Null => Ok(Vec::new()),
            other => Err(ImportError::InvalidPayload {
                message: format!(
                    "expected an array of links from {}, got {}",
                    self.config.endpoint,
                    type_name(&other)
                ),
            }),
        }
    }
}

#[async_trait]
impl LinkProvider for HttpLinkProvider {
    fn get_source(&self) -> LinkSource {
        self.config.kind
    }

    async fn get_links(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Link>> {
        let mut request = self
            .client
            .get(&self.config.endpoint)
            .timeout(Duration::from_secs(self.config.timeout_seconds()));

        if let Some(headers) = &self.config.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }
        if let Some(params) = &self.config.parameters {
            for (key, value) in params {
                request = request.query(&[(key, value)]);
            }
        }
        if let Some(since) = since {
            let value = since.to_rfc3339_opts(SecondsFormat::Secs, true);
            request = request.query(&[(self.config.since_param(), value)]);
        }

        tracing::debug!(source = %self.config.kind, endpoint = %self.config.endpoint, "Requesting links");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::SourceResponse {
                status: status.as_u16(),
                endpoint: self.config.endpoint.clone(),
            });
        }

        let body: Value = response.json().await?;
        let mut links = Vec::new();
        let mut skipped = 0usize;

        for item in self.items(body)? {
            let Value::Object(obj) = item else {
                skipped += 1;
                continue;
            };
            match map_link(self.config.kind, &self.config.field_mapping, obj) {
                Some(link) if since.map_or(true, |s| link.created_at > s) => links.push(link),
                Some(_) => {}
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                source = %self.config.kind,
                skipped,
                "Skipped items without id, url or a readable timestamp"
            );
        }
        Ok(links)
    }
}

fn map_link(source: LinkSource, mapping: &FieldMapping, mut obj: Map<String, Value>) -> Option<Link> {
    let external_id = match obj.remove(&mapping.id)? {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let url = match obj.remove(&mapping.url)? {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => return None,
    };
    let created_at = parse_timestamp(&obj.remove(&mapping.created_at)?)?;
    let title = match obj.remove(&mapping.title) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };

    Some(Link {
        source,
        external_id,
        created_at,
        title,
        url,
        metadata: obj.into_iter().collect(),
    })
}

/// RFC 3339 strings, or unix seconds as a number or numeric string.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return DateTime::from_timestamp(secs, 0);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_and_unix_timestamps() {
        let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(parse_timestamp(&json!(1_700_000_000)), Some(expected));
        assert_eq!(parse_timestamp(&json!("1700000000")), Some(expected));
        assert_eq!(
            parse_timestamp(&json!("2023-11-14T23:13:20+01:00")),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn maps_fields_and_keeps_the_rest_as_metadata() {
        let mapping = FieldMapping {
            id: "item_id".to_string(),
            url: "resolved_url".to_string(),
            title: "resolved_title".to_string(),
            created_at: "time_added".to_string(),
        };
        let obj = json!({
            "item_id": 42,
            "resolved_url": "https://example.com/article",
            "resolved_title": "An article",
            "time_added": "1700000000",
            "word_count": 812
        });
        let Value::Object(obj) = obj else { unreachable!() };

        let link = map_link(LinkSource::Pocket, &mapping, obj).unwrap();

        assert_eq!(link.external_id, "42");
        assert_eq!(link.url, "https://example.com/article");
        assert_eq!(link.title.as_deref(), Some("An article"));
        assert_eq!(link.metadata.len(), 1);
        assert_eq!(link.metadata["word_count"], json!(812));
    }

    #[test]
    fn items_without_url_are_not_mapped() {
        let obj = json!({ "id": "1", "created_at": "2024-01-01T00:00:00Z" });
        let Value::Object(obj) = obj else { unreachable!() };
        assert!(map_link(LinkSource::Custom, &FieldMapping::default(), obj).is_none());
    }
}
