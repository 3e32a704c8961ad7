use std::time::SystemTime;

use hyper::{Body, Response};
use tokio::sync::RwLock;

use crate::errors::ProxyError;
use crate::models::ModQuery;
use crate::services::{CacheStore, RateLimiter, UpstreamClient};

/// Routes one inbound query: rate-limit admission first, then the cache,
/// then a single upstream fetch on a miss. Rejected clients never touch the
/// cache or the network.
pub struct Dispatcher {
    limiter: RwLock<RateLimiter>,
    cache: RwLock<CacheStore>,
    upstream: UpstreamClient,
}

impl Dispatcher {
    pub fn new(limiter: RateLimiter, cache: CacheStore, upstream: UpstreamClient) -> Self {
        Self {
            limiter: RwLock::new(limiter),
            cache: RwLock::new(cache),
            upstream,
        }
    }

    /// Locks are taken per step and released before the fetch await; two
    /// concurrent misses for one query may therefore both fetch, and the
    /// later cache write wins.
    pub async fn handle(
        &self,
        client_key: &str,
        query: ModQuery,
        now: SystemTime,
    ) -> Result<Response<Body>, ProxyError> {
        if !self.limiter.write().await.admit(client_key, now) {
            tracing::warn!(client = client_key, "rate limit exceeded");
            return Err(ProxyError::RateLimitExceeded);
        }

        if let Some(payload) = self.cache.read().await.get(&query, now) {
            tracing::debug!(game_id = query.game_id, "cache hit");
            return payload.into_response("HIT");
        }

        let payload = self.upstream.fetch(&query).await?;
        self.cache.write().await.put(query, payload.clone(), now);
        payload.into_response("MISS")
    }
}
