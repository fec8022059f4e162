use std::time::Duration;

use serde_json::Value;

use crate::{
    cache::FileCache,
    config, debug,
    qobuz::{CatalogApi, is_empty_payload},
    types::Request,
    warning,
};

/// Cache-aware access to the remote catalog.
///
/// Nodes fetch through [`Catalog::get`]: a fresh cache entry is served as is,
/// a missing or stale one falls back to the remote API and the result is
/// written back. Mutations go through [`Catalog::call`], which bypasses the
/// cache, and then [`Catalog::invalidate`] what they changed.
pub struct Catalog<A: CatalogApi> {
    api: A,
    cache: FileCache,
    limit: u32,
    image_size: String,
    user_id: Option<String>,
    offline: bool,
}

impl<A: CatalogApi> Catalog<A> {
    pub fn new(api: A, cache: FileCache) -> Self {
        Self {
            api,
            cache,
            limit: config::DEFAULT_PAGINATION_LIMIT,
            image_size: "large".to_string(),
            user_id: None,
            offline: false,
        }
    }

    /// Catalog configured from the environment around the given API and
    /// user.
    pub fn from_env(api: A, user_id: Option<String>) -> Self {
        let cache = FileCache::new(config::cache_dir()).with_default_ttl(config::cache_ttl());
        Self::new(api, cache)
            .with_limit(config::pagination_limit())
            .with_image_size(config::image_size())
            .with_user_id(user_id)
            .with_offline(config::offline())
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_image_size(mut self, size: String) -> Self {
        self.image_size = size;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn image_size(&self) -> &str {
        &self.image_size
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Cached read of `request`.
    pub async fn get(&self, request: &Request) -> Option<Value> {
        let key = request.cache_key();
        let ttl = Duration::from_secs(self.cache.ttl(&request.endpoint));

        if let Some(age) = self.cache.age(&key).await {
            if age < ttl {
                if let Some(payload) = self.cache.load(&key).await {
                    debug!("Cache hit for {}", request.endpoint);
                    return Some(payload);
                }
            } else {
                debug!("Cache entry for {} is stale", request.endpoint);
            }
        }

        if self.offline {
            debug!("Offline, no cached response for {}", request.endpoint);
            return None;
        }

        let payload = self.call(request).await?;
        if !self.cache.store(&key, &payload).await {
            warning!("Proceeding without cache for {}", request.endpoint);
        }
        Some(payload)
    }

    /// Uncached remote call.
    pub async fn call(&self, request: &Request) -> Option<Value> {
        self.api
            .get(&request.endpoint, &request.args)
            .await
            .filter(|payload| !is_empty_payload(payload))
    }

    /// Drops the cached response of `request`, returns whether one existed.
    pub async fn invalidate(&self, request: &Request) -> bool {
        let removed = self.cache.delete(&request.cache_key()).await;
        if removed {
            debug!("Invalidated cached {}", request.endpoint);
        }
        removed
    }
}
