//! In-memory TTL cache for fetched panels.
//!
//! Keyed by feed URL. Uses [`moka`] so concurrent fetches share one cache
//! with automatic expiry.

use std::sync::OnceLock;
use std::time::Duration;

use moka::future::Cache;

use crate::types::PanelEntry;

/// Maximum number of cached feed documents.
const MAX_CACHE_ENTRIES: u64 = 64;

/// Global process-wide panel cache.
///
/// TTL is set when first created and cannot be changed afterwards.
static CACHE: OnceLock<Cache<String, Vec<PanelEntry>>> = OnceLock::new();

fn get_or_init_cache(ttl_seconds: u64) -> &'static Cache<String, Vec<PanelEntry>> {
    CACHE.get_or_init(|| {
        Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build()
    })
}

/// Cached entries for `url`, if still fresh. Always `None` when `ttl_seconds` is 0.
pub async fn get(url: &str, ttl_seconds: u64) -> Option<Vec<PanelEntry>> {
    if ttl_seconds == 0 {
        return None;
    }
    get_or_init_cache(ttl_seconds).get(url).await
}

/// Remember `entries` for `url`. No-op when `ttl_seconds` is 0.
pub async fn insert(url: &str, entries: Vec<PanelEntry>, ttl_seconds: u64) {
    if ttl_seconds == 0 {
        return;
    }
    get_or_init_cache(ttl_seconds)
        .insert(url.to_owned(), entries)
        .await;
}
