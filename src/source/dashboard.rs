//! Blockchair-style dashboard source
//!
//! Fetches block dashboards over HTTP: heights are comma-joined into the
//! request path, the response envelope carries a `data` map keyed by
//! height and a `context` object with the reported request cost.

use super::types::{FetchEnvelope, RawBlock};
use super::BlockSource;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::BlockHeight;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Wire shape of a dashboard response
#[derive(Debug, Deserialize)]
struct DashboardResponse {
    #[serde(default)]
    data: HashMap<String, DashboardEntry>,
    #[serde(default)]
    context: ResponseContext,
}

/// One per-height entry in the `data` map; the block payload may be absent
#[derive(Debug, Deserialize)]
struct DashboardEntry {
    #[serde(default)]
    block: Option<RawBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContext {
    #[serde(default)]
    cost: f64,
}

/// HTTP block source for dashboard-style APIs
pub struct DashboardSource {
    base_url: Url,
    api_key: Option<String>,
    client: HttpClient,
}

impl DashboardSource {
    /// Create a source for the given base URL, e.g.
    /// `https://api.blockchair.com/bitcoin`.
    ///
    /// A malformed base URL is a configuration error and fails before any
    /// request is issued.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            base_url,
            api_key: None,
            client: HttpClient::new(),
        })
    }

    /// Attach an API key, sent as the `key` query parameter
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the HTTP client (custom timeouts, retries, rate limits)
    #[must_use]
    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    /// Build the dashboard URL for a chunk of heights
    fn dashboard_url(&self, heights: &[BlockHeight]) -> String {
        let joined = heights
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/dashboards/blocks/{joined}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Decode a response body into an envelope
    fn decode_envelope(body: &str) -> Result<FetchEnvelope> {
        let response: DashboardResponse = serde_json::from_str(body)?;

        let mut entries = HashMap::with_capacity(response.data.len());
        for (key, entry) in response.data {
            let height: BlockHeight = key
                .parse()
                .map_err(|_| Error::decode(format!("non-numeric height key '{key}'")))?;
            entries.insert(height, entry.block);
        }

        Ok(FetchEnvelope {
            cost: response.context.cost,
            entries,
        })
    }
}

#[async_trait]
impl BlockSource for DashboardSource {
    async fn fetch(&self, heights: &[BlockHeight]) -> Result<FetchEnvelope> {
        let url = self.dashboard_url(heights);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        debug!("Fetching {} heights", heights.len());
        let body = self.client.get_text(&url, &query).await?;
        Self::decode_envelope(&body)
    }
}

impl std::fmt::Debug for DashboardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSource")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> DashboardSource {
        DashboardSource::new("https://api.blockchair.com/bitcoin").unwrap()
    }

    #[test]
    fn test_dashboard_url_joins_heights() {
        let url = source().dashboard_url(&[100_000, 100_001, 100_002]);
        assert_eq!(
            url,
            "https://api.blockchair.com/bitcoin/dashboards/blocks/100000,100001,100002"
        );
    }

    #[test]
    fn test_dashboard_url_trims_trailing_slash() {
        let src = DashboardSource::new("https://api.blockchair.com/bitcoin/").unwrap();
        let url = src.dashboard_url(&[7]);
        assert_eq!(
            url,
            "https://api.blockchair.com/bitcoin/dashboards/blocks/7"
        );
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        assert!(DashboardSource::new("not a url").is_err());
    }

    #[test]
    fn test_decode_envelope_cost_and_entries() {
        let body = json!({
            "data": {
                "100000": { "block": { "id": 100_000, "size": 215 } },
                "100001": { "block": { "id": 100_001, "size": 388 } }
            },
            "context": { "cost": 2.0 }
        })
        .to_string();

        let envelope = DashboardSource::decode_envelope(&body).unwrap();
        assert_eq!(envelope.cost, 2.0);
        assert_eq!(envelope.entries.len(), 2);
        assert_eq!(envelope.present_count(), 2);
        assert!(envelope.entries[&100_000].is_some());
    }

    #[test]
    fn test_decode_envelope_missing_payload() {
        let body = json!({
            "data": {
                "100000": { "block": { "id": 100_000 } },
                "100001": {}
            },
            "context": { "cost": 1.0 }
        })
        .to_string();

        let envelope = DashboardSource::decode_envelope(&body).unwrap();
        assert_eq!(envelope.entries.len(), 2);
        assert_eq!(envelope.present_count(), 1);
        assert!(envelope.entries[&100_001].is_none());
    }

    #[test]
    fn test_decode_envelope_defaults() {
        // No data, no context: empty envelope with zero cost
        let envelope = DashboardSource::decode_envelope("{}").unwrap();
        assert_eq!(envelope.cost, 0.0);
        assert!(envelope.entries.is_empty());
    }

    #[test]
    fn test_decode_envelope_rejects_non_numeric_key() {
        let body = json!({
            "data": { "abc": { "block": {} } },
            "context": { "cost": 1.0 }
        })
        .to_string();

        let err = DashboardSource::decode_envelope(&body).unwrap_err();
        assert!(err.to_string().contains("non-numeric height key"));
    }

    #[test]
    fn test_decode_envelope_rejects_garbage() {
        assert!(DashboardSource::decode_envelope("not json").is_err());
    }
}
