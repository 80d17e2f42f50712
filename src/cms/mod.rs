//! Read-only client for the hosted CMS content API.
//!
//! The CMS is an external collaborator: paginated JSON over HTTP, validated
//! into typed [`Post`] records at the boundary, cached with a short TTL, and
//! retried with capped backoff on transient failures.

mod cache;
mod types;

pub use cache::PostCache;
pub use types::{Author, Category, Post};

use crate::config::CmsConfig;
use crate::error::CmsError;
use reqwest::Client;
use std::time::Duration;
use types::{PostListResponse, PostResponse};

pub struct CmsClient {
    client: Client,
    base_url: String,
    page_size: usize,
    max_retries: u32,
    cache: PostCache,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Self {
        Self::with_cache(
            config,
            PostCache::new(Duration::from_secs(config.cache_ttl_secs)),
        )
    }

    /// Construct with an injected cache; tests pass a zero-TTL or pre-seeded
    /// instance.
    pub fn with_cache(config: &CmsConfig, cache: PostCache) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            max_retries: config.max_retries,
            cache,
        }
    }

    pub async fn post(&self, id: u64) -> Result<Post, CmsError> {
        let key = format!("post:{id}");
        if let Some(mut cached) = self.cache.get(&key)
            && let Some(post) = cached.pop()
        {
            return Ok(post);
        }

        let url = format!("{}/posts/{id}", self.base_url);
        let value = match self.get_json(&url, &[]).await {
            Err(CmsError::Status { status: 404, .. }) => return Err(CmsError::NotFound { id }),
            other => other?,
        };
        let decoded: PostResponse =
            serde_json::from_value(value).map_err(|e| CmsError::Decode(e.to_string()))?;

        self.cache.put(&key, vec![decoded.data.clone()]);
        Ok(decoded.data)
    }

    pub async fn recent_posts(&self, n: usize) -> Result<Vec<Post>, CmsError> {
        let key = format!("recent:{n}");
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let mut posts = self.fetch_pages(Some(n)).await?;
        posts.truncate(n);
        self.cache.put(&key, posts.clone());
        Ok(posts)
    }

    pub async fn all_posts(&self) -> Result<Vec<Post>, CmsError> {
        if let Some(cached) = self.cache.get("all") {
            return Ok(cached);
        }

        let posts = self.fetch_pages(None).await?;
        self.cache.put("all", posts.clone());
        Ok(posts)
    }

    async fn fetch_pages(&self, limit: Option<usize>) -> Result<Vec<Post>, CmsError> {
        let url = format!("{}/posts", self.base_url);
        let mut posts = Vec::new();
        let mut page = 1usize;

        loop {
            let value = self
                .get_json(
                    &url,
                    &[
                        ("page", page.to_string()),
                        ("page_size", self.page_size.to_string()),
                    ],
                )
                .await?;
            let decoded: PostListResponse =
                serde_json::from_value(value).map_err(|e| CmsError::Decode(e.to_string()))?;

            let batch_len = decoded.data.len();
            posts.extend(decoded.data);

            // An empty page means no further progress is possible, whatever
            // the pagination metadata claims.
            if batch_len == 0 {
                break;
            }
            if limit.is_some_and(|n| posts.len() >= n) {
                break;
            }
            match decoded.meta.pagination {
                // Compare against the local page counter: a CMS that echoes
                // a stale `page` back would otherwise never converge.
                Some(pagination) if page < pagination.page_count => page += 1,
                Some(_) => break,
                // No pagination metadata: stop when a page comes back short.
                None if batch_len == self.page_size => page += 1,
                None => break,
            }
        }

        Ok(posts)
    }

    /// GET with capped retry-with-backoff: transport errors and 5xx are
    /// retried `max_retries` times with a doubling delay; 4xx are not.
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, CmsError> {
        let mut delay = Duration::from_millis(250);
        let mut attempt = 0u32;

        loop {
            match self.client.get(url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json()
                            .await
                            .map_err(|e| CmsError::Decode(e.to_string()));
                    }
                    if status.is_server_error() && attempt < self.max_retries {
                        tracing::warn!(
                            url,
                            status = status.as_u16(),
                            attempt,
                            "cms returned server error, retrying"
                        );
                    } else {
                        return Err(CmsError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }
                }
                Err(e) if attempt < self.max_retries => {
                    tracing::warn!(url, error = %e, attempt, "cms request failed, retrying");
                }
                Err(e) => {
                    return Err(CmsError::Request {
                        url: url.to_string(),
                        message: e.without_url().to_string(),
                    });
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }
}
