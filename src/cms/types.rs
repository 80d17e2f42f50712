use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One blog post as served by the CMS content API.
///
/// Decoded strictly at the boundary: a record missing `id`, `slug`, `title`,
/// or `body` is a decode error, not a silent pass-through into summaries.
/// Unknown upstream fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub title: String,
    /// Rendered HTML body
    pub body: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Envelope for a single-post response.
#[derive(Debug, Deserialize)]
pub(super) struct PostResponse {
    pub data: Post,
}

/// Envelope for a paginated list response.
#[derive(Debug, Deserialize)]
pub(super) struct PostListResponse {
    pub data: Vec<Post>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Pagination {
    pub page: usize,
    pub page_count: usize,
}
