use std::time::Duration;

use tabled::Table;

use crate::{
    cache::FileCache,
    config, info, success,
    types::CacheInfoRow,
};

fn open_cache() -> FileCache {
    FileCache::new(config::cache_dir()).with_default_ttl(config::cache_ttl())
}

/// Removes up to `limit` entries older than `max_age` seconds (the cache TTL
/// by default).
pub async fn cache_clean(limit: usize, max_age: Option<u64>) {
    let cache = open_cache();
    let max_age = Duration::from_secs(max_age.unwrap_or_else(config::cache_ttl));
    info!(
        "Removing entries older than {}s from {}",
        max_age.as_secs(),
        cache.base_path().display()
    );
    let removed = cache.sweep(max_age, limit).await;
    success!("Removed {} expired entries", removed);
}

pub async fn cache_clear() {
    let cache = open_cache();
    let removed = cache.clear().await;
    success!("Removed {} entries", removed);
}

pub async fn cache_info() {
    let cache = open_cache();
    let row = CacheInfoRow {
        directory: cache.base_path().display().to_string(),
        entries: cache.entries().await,
        default_ttl: config::cache_ttl(),
    };
    println!("{}", Table::new(vec![row]));
}
