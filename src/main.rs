use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use modio_proxy::config::ProxyConfig;
use modio_proxy::handlers;
use modio_proxy::services::{CacheStore, Dispatcher, RateLimiter, UpstreamClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Serving without the key would only ever produce upstream auth errors.
    let config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };

    let limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window);
    let cache = CacheStore::new(config.cache_ttl);
    let upstream = UpstreamClient::new(
        config.api_key.clone(),
        config.api_base.clone(),
        config.request_timeout,
    );
    let dispatcher = Arc::new(Dispatcher::new(limiter, cache, upstream));

    let routes = handlers::routes(dispatcher, config.game_id);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!(%addr, game_id = config.game_id, "mod catalog proxy listening");
    warp::serve(routes).run(addr).await;
}
