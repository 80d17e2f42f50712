use super::types::Post;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Explicit, injectable TTL cache for CMS responses.
///
/// Entries expire after the TTL and are evicted lazily on read. One instance
/// is owned per client — never module-global — so tests can inject a
/// zero-TTL or pre-seeded cache and requests stay isolated.
#[derive(Debug)]
pub struct PostCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    expires_at: Instant,
    posts: Vec<Post>,
}

impl PostCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that stores nothing.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn get(&self, key: &str) -> Option<Vec<Post>> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.posts.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: &str, posts: Vec<Post>) {
        if self.ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            expires_at: Instant::now() + self.ttl,
            posts,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);
    }
}
