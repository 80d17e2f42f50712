use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from TOML.
///
/// Every section and field has a default, so an empty file (or no file at all)
/// yields a usable configuration pointing at a local CMS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from the platform config
    /// dir (`<config>/linkscout/config.toml`), falling back to defaults when
    /// no file exists. An explicit path that is missing or malformed is an
    /// error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Load(format!("{}: {e}", p.display())))?;
                toml::from_str(&raw)
                    .map_err(|e| ConfigError::Load(format!("{}: {e}", p.display())))?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => {
                    let raw = std::fs::read_to_string(&p)?;
                    toml::from_str(&raw)
                        .map_err(|e| ConfigError::Load(format!("{}: {e}", p.display())))?
                }
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "linkscout")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.checker.concurrency == 0 {
            return Err(ConfigError::Validation(
                "checker.concurrency must be at least 1".into(),
            ));
        }
        if self.checker.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "checker.timeout_secs must be at least 1".into(),
            ));
        }
        if self.cms.page_size == 0 {
            return Err(ConfigError::Validation(
                "cms.page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ─── CMS content API ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Base URL of the hosted CMS content API
    #[serde(default = "default_cms_base_url")]
    pub base_url: String,
    /// Per-request timeout (default: 10s)
    #[serde(default = "default_cms_timeout")]
    pub timeout_secs: u64,
    /// TTL for the post cache (default: 60s; 0 disables caching)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Page size when listing posts (default: 25)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Retries on 5xx/transport failure, with doubling backoff (default: 2)
    #[serde(default = "default_cms_retries")]
    pub max_retries: u32,
}

fn default_cms_base_url() -> String {
    "http://127.0.0.1:1337".into()
}

fn default_cms_timeout() -> u64 {
    10
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_page_size() -> usize {
    25
}

fn default_cms_retries() -> u32 {
    2
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: default_cms_base_url(),
            timeout_secs: default_cms_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            page_size: default_page_size(),
            max_retries: default_cms_retries(),
        }
    }
}

// ─── Link checker ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Per-link request timeout (default: 8s)
    #[serde(default = "default_checker_timeout")]
    pub timeout_secs: u64,
    /// Links verified in parallel within one batch (default: 8)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Max chars of surrounding text kept per link (default: 150)
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
    /// Hosts never checked: the site itself, share widgets, asset CDNs
    #[serde(default = "default_skip_hosts")]
    pub skip_hosts: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_checker_timeout() -> u64 {
    8
}

fn default_concurrency() -> usize {
    8
}

fn default_context_chars() -> usize {
    150
}

fn default_skip_hosts() -> Vec<String> {
    vec![
        "twitter.com".into(),
        "x.com".into(),
        "facebook.com".into(),
        "linkedin.com".into(),
        "pinterest.com".into(),
    ]
}

fn default_user_agent() -> String {
    format!("linkscout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_checker_timeout(),
            concurrency: default_concurrency(),
            context_chars: default_context_chars(),
            skip_hosts: default_skip_hosts(),
            user_agent: default_user_agent(),
        }
    }
}

// ─── Archive snapshot lookup ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Look up archive snapshots for confirmed-dead links (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Wayback-style availability endpoint
    #[serde(default = "default_archive_endpoint")]
    pub endpoint: String,
    /// Lookup timeout — kept short, this call is best-effort (default: 5s)
    #[serde(default = "default_archive_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_archive_endpoint() -> String {
    "https://archive.org/wayback/available".into()
}

fn default_archive_timeout() -> u64 {
    5
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_archive_endpoint(),
            timeout_secs: default_archive_timeout(),
        }
    }
}

// ─── Gateway ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Gateway port (default: 8080)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Allow binding to non-localhost (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            allow_public_bind: false,
        }
    }
}

// ─── Webhook sink ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Operator-supplied URL; notifications are skipped when unset
    #[serde(default)]
    pub url: Option<String>,
    /// Optional HMAC-SHA256 signing secret (`X-Linkscout-Signature-256`)
    #[serde(default)]
    pub secret: Option<String>,
    /// Dashboard URL included in the payload for one-click review
    #[serde(default)]
    pub dashboard_url: Option<String>,
    /// Delivery timeout (default: 10s)
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    10
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            secret: None,
            dashboard_url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

// ─── Export sink ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for exported summaries (default: ./exports)
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}
