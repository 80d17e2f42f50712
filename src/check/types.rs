use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An outbound URL extracted from one post body, pending verification.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    pub url: String,
    /// Trimmed text surrounding the anchor, to aid human review
    pub context: String,
    pub post_id: u64,
    pub post_slug: String,
    pub post_title: String,
}

/// The classified result of checking one candidate link.
///
/// Only produced for links that are not alive; a 2xx/3xx response leaves no
/// outcome. Created by the verifier, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkOutcome {
    pub url: String,
    pub context: String,
    pub post_id: u64,
    pub post_slug: String,
    pub post_title: String,
    /// HTTP status, or `None` for network-level failures
    pub status: Option<u16>,
    /// Short diagnostic for network failures and the 403 hint
    pub error: Option<String>,
    /// The failure may be transient. A hint for the operator — nothing in
    /// this system re-issues the request automatically.
    pub retryable: bool,
    /// 403 — commonly bot-blocking, deliberately distinguished from dead
    pub forbidden: bool,
    pub timed_out: bool,
    /// Historical copy from the web archive, when one was found
    pub archive_url: Option<String>,
    /// Advisory URL-shape hints, not a guarantee of correctness
    pub suggestions: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

/// Per-post breakdown within a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReport {
    pub post_id: u64,
    pub post_slug: String,
    pub post_title: String,
    pub total_links: usize,
    pub dead: Vec<LinkOutcome>,
}

/// Aggregate result of one check invocation, folded incrementally by the
/// orchestrator and finalized once all posts are processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total_posts: usize,
    pub total_links: usize,
    pub dead_links: usize,
    pub forbidden_errors: usize,
    pub timeout_errors: usize,
    pub retryable_errors: usize,
    pub processing_time_ms: u64,
    pub posts: Vec<PostReport>,
    pub recommendations: Vec<String>,
}
