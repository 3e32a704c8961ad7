pub mod cache;
pub mod dispatch;
pub mod rate_limit;
pub mod upstream;

pub use cache::CacheStore;
pub use dispatch::Dispatcher;
pub use rate_limit::RateLimiter;
pub use upstream::UpstreamClient;
