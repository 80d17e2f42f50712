use super::extractor;
use super::report;
use super::types::{CheckSummary, PostReport};
use super::verifier::Verifier;
use crate::cms::{CmsClient, Post};
use crate::config::CheckerConfig;
use crate::error::CmsError;
use futures_util::stream::{self, StreamExt};
use std::time::Instant;

/// Which posts one check invocation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckScope {
    /// A single post by id
    Post(u64),
    /// The N most recent posts
    Recent(usize),
    /// Every post. Slow and bandwidth-hungry on large sites; no cap is
    /// imposed here beyond the per-request timeout.
    All,
}

impl CheckScope {
    /// Resolve the scope against the CMS. This is the one step whose failure
    /// surfaces to the caller — without a post list there is nothing to check.
    pub async fn resolve(self, cms: &CmsClient) -> Result<Vec<Post>, CmsError> {
        match self {
            Self::Post(id) => Ok(vec![cms.post(id).await?]),
            Self::Recent(n) => cms.recent_posts(n).await,
            Self::All => cms.all_posts().await,
        }
    }
}

/// Run extraction and verification over a resolved set of posts and fold the
/// per-link outcomes into a summary.
///
/// Link checks within a post run with bounded parallelism and no ordering
/// guarantee; counters are folded sequentially after the outcomes resolve.
/// One link failing never aborts the batch — its outcome is recorded and the
/// run proceeds.
pub async fn run_check(
    posts: &[Post],
    verifier: &Verifier,
    config: &CheckerConfig,
) -> CheckSummary {
    let started = Instant::now();
    let mut summary = CheckSummary {
        total_posts: posts.len(),
        ..CheckSummary::default()
    };

    for post in posts {
        let candidates = extractor::extract_links(post, config);
        let candidate_count = candidates.len();
        tracing::debug!(post = %post.slug, links = candidate_count, "extracted candidate links");

        let dead: Vec<_> = stream::iter(candidates)
            .map(|link| async move { verifier.check(&link).await })
            .buffer_unordered(config.concurrency)
            .filter_map(|outcome| async move { outcome })
            .collect()
            .await;

        summary.total_links += candidate_count;
        summary.dead_links += dead.len();
        summary.forbidden_errors += dead.iter().filter(|o| o.forbidden).count();
        summary.timeout_errors += dead.iter().filter(|o| o.timed_out).count();
        summary.retryable_errors += dead.iter().filter(|o| o.retryable).count();

        if dead.is_empty() {
            tracing::debug!(post = %post.slug, links = candidate_count, "post clean");
        } else {
            tracing::info!(
                post = %post.slug,
                dead = dead.len(),
                total = candidate_count,
                "dead links found"
            );
        }

        summary.posts.push(PostReport {
            post_id: post.id,
            post_slug: post.slug.clone(),
            post_title: post.title.clone(),
            total_links: candidate_count,
            dead,
        });
    }

    summary.processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    summary.recommendations = report::recommendations(&summary);

    tracing::info!(
        posts = summary.total_posts,
        links = summary.total_links,
        dead = summary.dead_links,
        elapsed_ms = summary.processing_time_ms,
        "check complete"
    );
    summary
}
