use super::types::CheckSummary;

/// Derive human-readable recommendations from the finished counts.
///
/// Pure, deterministic mapping from counts to text; no side effects. A run
/// that checked no links at all produces no recommendations.
pub fn recommendations(summary: &CheckSummary) -> Vec<String> {
    let mut out = Vec::new();

    if summary.forbidden_errors > 0 {
        out.push(format!(
            "{} link(s) returned 403 Forbidden — commonly bot-blocking, not a true dead link; \
             verify these in a browser before removing them",
            summary.forbidden_errors
        ));
    }

    if summary.timeout_errors > 0 {
        out.push(format!(
            "{} link(s) timed out — these may be slow servers, not necessarily dead; \
             consider re-running the check",
            summary.timeout_errors
        ));
    }

    // Timeouts are retryable by definition; report the remainder separately.
    let transient = summary
        .retryable_errors
        .saturating_sub(summary.timeout_errors);
    if transient > 0 {
        out.push(format!(
            "{transient} failure(s) look transient (429/5xx or network) — \
             re-run the check before acting on them"
        ));
    }

    let hard_dead = summary.dead_links.saturating_sub(summary.forbidden_errors);
    if hard_dead > 0 {
        out.push(format!(
            "{hard_dead} of {} link(s) appear dead — update or remove them, \
             or link to the archived copy where one was found",
            summary.total_links
        ));
    }

    if summary.dead_links == 0 && summary.total_links > 0 {
        out.push(format!(
            "All {} checked link(s) are reachable",
            summary.total_links
        ));
    }

    out
}
