use crate::check::CheckSummary;
use crate::config::WebhookConfig;
use crate::error::NotifyError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;

/// Max dead-link entries included in one payload; the dashboard has the rest.
const MAX_DETAIL_ENTRIES: usize = 20;

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub r#type: String,
    pub timestamp: DateTime<Utc>,
    pub data: WebhookData,
    pub dashboard_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookData {
    pub total_dead_links: usize,
    pub posts_affected: usize,
    pub summary: String,
    pub details: Vec<WebhookDetail>,
}

#[derive(Debug, Serialize)]
pub struct WebhookDetail {
    pub post_slug: String,
    pub url: String,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Pushes a finished summary to an operator-supplied URL. 2xx is success;
/// anything else is an error the caller may log — notification failure never
/// fails the check itself.
pub struct WebhookSink {
    client: Client,
    config: WebhookConfig,
}

impl WebhookSink {
    pub fn new(config: &WebhookConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn payload(&self, summary: &CheckSummary) -> WebhookPayload {
        let posts_affected = summary
            .posts
            .iter()
            .filter(|post| !post.dead.is_empty())
            .count();
        let details = summary
            .posts
            .iter()
            .flat_map(|post| {
                post.dead.iter().map(move |outcome| WebhookDetail {
                    post_slug: post.post_slug.clone(),
                    url: outcome.url.clone(),
                    status: outcome.status,
                    error: outcome.error.clone(),
                })
            })
            .take(MAX_DETAIL_ENTRIES)
            .collect();

        WebhookPayload {
            r#type: "dead_link_report".into(),
            timestamp: Utc::now(),
            data: WebhookData {
                total_dead_links: summary.dead_links,
                posts_affected,
                summary: format!(
                    "{} dead link(s) across {} post(s), {} link(s) checked",
                    summary.dead_links, posts_affected, summary.total_links
                ),
                details,
            },
            dashboard_url: self.config.dashboard_url.clone(),
        }
    }

    pub async fn send(&self, summary: &CheckSummary) -> Result<(), NotifyError> {
        let Some(url) = self.config.url.as_deref() else {
            return Err(NotifyError::NotConfigured);
        };

        let payload = self.payload(summary);
        let body = serde_json::to_vec(&payload).map_err(|e| NotifyError::Delivery {
            message: e.to_string(),
        })?;

        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(secret) = self.config.secret.as_deref()
            && let Some(signature) = sign_payload(secret, &body)
        {
            request = request.header("X-Linkscout-Signature-256", signature);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(dead = summary.dead_links, "webhook notified");
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// HMAC-SHA256 over the exact request body, formatted `sha256=<hex>` the way
/// webhook receivers conventionally verify it.
pub fn sign_payload(secret: &str, body: &[u8]) -> Option<String> {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return None;
    };
    mac.update(body);
    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}
