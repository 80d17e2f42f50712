use super::AppState;
use crate::check::{self, CheckScope};
use crate::error::CmsError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

/// GET /health — liveness probe
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Query parameters selecting check scope. Exactly one of `post`, `recent`,
/// or `all` must be given.
#[derive(Debug, Deserialize)]
pub(super) struct CheckQuery {
    post: Option<u64>,
    recent: Option<usize>,
    #[serde(default)]
    all: bool,
    /// Push the finished summary to the configured webhook
    #[serde(default)]
    notify: bool,
}

fn resolve_scope(query: &CheckQuery) -> Result<CheckScope, &'static str> {
    match (query.post, query.recent, query.all) {
        (Some(id), None, false) => Ok(CheckScope::Post(id)),
        (None, Some(n), false) => Ok(CheckScope::Recent(n)),
        (None, None, true) => Ok(CheckScope::All),
        (None, None, false) => Err("select a scope: ?post=<id>, ?recent=<n>, or ?all=true"),
        _ => Err("post, recent, and all are mutually exclusive"),
    }
}

/// GET /check — run a dead-link check and return the summary
pub(super) async fn handle_check(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> impl IntoResponse {
    let scope = match resolve_scope(&query) {
        Ok(scope) => scope,
        Err(message) => {
            let err = serde_json::json!({"error": message});
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    let posts = match scope.resolve(&state.cms).await {
        Ok(posts) => posts,
        Err(CmsError::NotFound { id }) => {
            let err = serde_json::json!({"error": format!("post {id} not found")});
            return (StatusCode::NOT_FOUND, Json(err));
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve posts from cms");
            let err = serde_json::json!({"error": format!("cms unavailable: {e}")});
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(err));
        }
    };

    let summary = check::run_check(&posts, &state.verifier, &state.checker).await;

    if query.notify {
        // Fan-out is best-effort; the check result stands either way.
        if let Err(e) = state.webhook.send(&summary).await {
            tracing::warn!(error = %e, "webhook notification failed");
        }
    }

    match serde_json::to_value(&summary) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            let err = serde_json::json!({"error": e.to_string()});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err))
        }
    }
}
