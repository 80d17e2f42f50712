use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `linkscout`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains. Note that per-link verification
/// failures are *not* errors — they are recorded as [`crate::check::LinkOutcome`]
/// data and never propagate through this hierarchy.
#[derive(Debug, Error)]
pub enum ScoutError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── CMS content API ─────────────────────────────────────────────────
    #[error("cms: {0}")]
    Cms(#[from] CmsError),

    // ── Notification / export sinks ─────────────────────────────────────
    #[error("notify: {0}")]
    Notify(#[from] NotifyError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── CMS content API errors ─────────────────────────────────────────────────

/// The CMS is the one collaborator whose failure surfaces to the caller:
/// without a post list there is nothing to check.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("cms returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("post {id} not found")]
    NotFound { id: u64 },

    #[error("malformed cms response: {0}")]
    Decode(String),
}

// ─── Notification / export errors ───────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook url not configured")]
    NotConfigured,

    #[error("webhook delivery failed: {message}")]
    Delivery { message: String },

    #[error("webhook endpoint returned HTTP {status}")]
    Rejected { status: u16 },

    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = ScoutError::Config(ConfigError::Validation("bad concurrency".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn cms_status_error_displays_url_and_code() {
        let err = ScoutError::Cms(CmsError::Status {
            url: "https://cms.example.com/posts".into(),
            status: 502,
        });
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("cms.example.com"));
    }

    #[test]
    fn notify_rejected_displays_status() {
        let err = ScoutError::Notify(NotifyError::Rejected { status: 410 });
        assert!(err.to_string().contains("410"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let scout_err: ScoutError = anyhow_err.into();
        assert!(scout_err.to_string().contains("something went wrong"));
    }
}
