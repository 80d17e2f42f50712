//! Axum HTTP surface for running checks remotely.
//!
//! Body limits and request timeouts are applied at the router level; the
//! check endpoint is deliberately given a long budget since "all posts" runs
//! are legitimately slow.

mod handlers;

use crate::check::Verifier;
use crate::cms::CmsClient;
use crate::config::{CheckerConfig, Config};
use crate::notify::WebhookSink;
use anyhow::Result;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use handlers::{handle_check, handle_health};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (16KB) — the API only takes query parameters
pub const MAX_BODY_SIZE: usize = 16_384;
/// Request timeout. Generous: an "all posts" check walks every outbound link.
pub const REQUEST_TIMEOUT_SECS: u64 = 600;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub cms: Arc<CmsClient>,
    pub verifier: Arc<Verifier>,
    pub checker: CheckerConfig,
    pub webhook: Arc<WebhookSink>,
}

fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host} — gateway would be exposed to the internet.\n\
             Fix: use --host 127.0.0.1 (default), or set [gateway] allow_public_bind = true\n\
             in config.toml behind a reverse proxy."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_gateway_with_listener(listener, config).await
}

/// Run the gateway from a pre-bound listener (tests bind an ephemeral port).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let addr = listener.local_addr()?;

    let state = AppState {
        cms: Arc::new(CmsClient::new(&config.cms)),
        verifier: Arc::new(Verifier::new(&config.checker, &config.archive)),
        checker: config.checker.clone(),
        webhook: Arc::new(WebhookSink::new(&config.webhook)),
    };

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/check", get(handle_check))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .with_state(state);

    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
