use crate::config::ArchiveConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Best-effort snapshot lookup against a Wayback-style availability API.
///
/// Every failure — transport, timeout, unusable body — maps to `None`. This
/// call must never fail the overall check; a dead-link outcome is still
/// usable without an archive link.
pub struct ArchiveClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Default, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    #[serde(default)]
    available: bool,
    url: Option<String>,
}

impl ArchiveClient {
    pub fn new(config: &ArchiveConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    /// Look up a historical snapshot of `target`. `None` on any failure.
    pub async fn lookup(&self, target: &str) -> Option<String> {
        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("url", target)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "archive lookup failed");
                return None;
            }
        };

        let body: AvailabilityResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "archive lookup returned unusable body");
                return None;
            }
        };

        body.archived_snapshots
            .closest
            .filter(|closest| closest.available)
            .and_then(|closest| closest.url)
    }
}
