use std::fmt;

#[derive(Debug)]
pub enum ProxyError {
    RateLimitExceeded,
    UpstreamUnreachable,
    InvalidUri(String),
    Http(String),
    MissingApiKey,
    InvalidConfig(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::UpstreamUnreachable => write!(f, "Upstream unreachable"),
            Self::InvalidUri(e) => write!(f, "Invalid URI: {}", e),
            Self::Http(e) => write!(f, "HTTP Error: {}", e),
            Self::MissingApiKey => write!(f, "MODIO_KEY is not set"),
            Self::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl warp::reject::Reject for ProxyError {}
