use super::archive::ArchiveClient;
use super::types::{CandidateLink, LinkOutcome};
use crate::config::{ArchiveConfig, CheckerConfig};
use chrono::Utc;
use reqwest::{Client, StatusCode, redirect};
use std::time::Duration;
use url::Url;

/// Statuses classified as retryable: rate limiting and transient upstream
/// failures. Retryability is surfaced to the operator, never acted on here.
const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

const FORBIDDEN_HINT: &str =
    "403 Forbidden — often bot protection; the page may still load in a browser";

/// Issues one HTTP request per candidate link and classifies the outcome.
///
/// Contract: always returns a classification, never an error, for
/// network-level conditions. Dead links optionally get an archive snapshot
/// attached; archive failures are swallowed.
pub struct Verifier {
    client: Client,
    archive: Option<ArchiveClient>,
}

impl Verifier {
    pub fn new(config: &CheckerConfig, archive: &ArchiveConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|_| Client::new());
        let archive = archive.enabled.then(|| ArchiveClient::new(archive));
        Self { client, archive }
    }

    /// Check one candidate link. `None` means alive; `Some(outcome)` is a
    /// dead or degraded link with its classification.
    pub async fn check(&self, link: &CandidateLink) -> Option<LinkOutcome> {
        match self.probe(&link.url).await {
            Ok(status) if status.is_success() || status.is_redirection() => {
                tracing::debug!(url = %link.url, status = status.as_u16(), "link alive");
                None
            }
            Ok(status) => {
                tracing::debug!(url = %link.url, status = status.as_u16(), "link dead");
                Some(self.dead_outcome(link, Some(status.as_u16()), None, false).await)
            }
            Err(e) => {
                let timed_out = e.is_timeout();
                let message = describe_failure(&e);
                tracing::debug!(url = %link.url, error = %message, "link check failed");
                Some(self.dead_outcome(link, None, Some(message), timed_out).await)
            }
        }
    }

    /// HEAD first; origins that reject HEAD outright (405/501) get a
    /// lightweight GET so they are not misreported as dead.
    async fn probe(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        let status = self.client.head(url).send().await?.status();
        if matches!(
            status,
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            return Ok(self.client.get(url).send().await?.status());
        }
        Ok(status)
    }

    async fn dead_outcome(
        &self,
        link: &CandidateLink,
        status: Option<u16>,
        error: Option<String>,
        timed_out: bool,
    ) -> LinkOutcome {
        let forbidden = status == Some(403);
        let network_failure = error.is_some();
        let retryable =
            network_failure || status.is_some_and(|s| RETRYABLE_STATUSES.contains(&s));
        let error = if forbidden {
            Some(FORBIDDEN_HINT.to_string())
        } else {
            error
        };

        let archive_url = match &self.archive {
            Some(archive) => archive.lookup(&link.url).await,
            None => None,
        };

        LinkOutcome {
            url: link.url.clone(),
            context: link.context.clone(),
            post_id: link.post_id,
            post_slug: link.post_slug.clone(),
            post_title: link.post_title.clone(),
            status,
            error,
            retryable,
            forbidden,
            timed_out,
            archive_url,
            suggestions: suggest(&link.url),
            checked_at: Utc::now(),
        }
    }
}

fn describe_failure(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".into()
    } else if error.is_connect() {
        "connection failed (dns, refused, or tls)".into()
    } else if error.is_redirect() {
        "too many redirects".into()
    } else {
        error.to_string()
    }
}

/// Advisory URL-shape hints derived from string heuristics. Not a guarantee
/// of correctness — the operator decides what to do with them.
pub fn suggest(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return Vec::new();
    };
    let mut suggestions = Vec::new();

    if parsed.scheme() == "http" {
        suggestions.push(format!(
            "Try the https version: {}",
            url.replacen("http://", "https://", 1)
        ));
    }

    let path = parsed.path();
    if path.contains("//") {
        suggestions.push("The path contains duplicate slashes — check for a paste error".into());
    }
    if path.len() > 1 && path.ends_with('/') {
        suggestions.push(format!(
            "Try without the trailing slash: {}",
            url.trim_end_matches('/')
        ));
    }

    if let Some(host) = parsed.host_str() {
        if let Some(bare) = host.strip_prefix("www.") {
            suggestions.push(format!(
                "Try without the www prefix: {}",
                url.replacen(host, bare, 1)
            ));
        } else if host.split('.').count() == 2 {
            suggestions.push(format!(
                "Try the www variant: {}",
                url.replacen(host, &format!("www.{host}"), 1)
            ));
        }
    }

    suggestions
}
