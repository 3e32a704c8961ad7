use std::str::FromStr;
use std::time::Duration;

use crate::errors::ProxyError;

pub const DEFAULT_GAME_ID: u32 = 11342;
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 60; // requests per window
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60; // window size in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_PORT: u16 = 3030;

/// Sent on every outbound request so upstream can identify this client.
pub const USER_AGENT: &str = "BeQuail-ModBrowser/1.0";

/// Runtime configuration, read once from the environment at startup.
///
/// The API key is the only required value; everything else falls back to the
/// defaults above. Malformed numeric values are a startup error rather than a
/// silent fallback.
pub struct ProxyConfig {
    pub api_key: String,
    pub game_id: u32,
    /// Overrides the per-game upstream base URL, e.g. for a staging upstream.
    pub api_base: Option<String>,
    pub cache_ttl: Duration,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
    pub request_timeout: Duration,
    pub port: u16,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    fn from_source<F>(get: F) -> Result<Self, ProxyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get("MODIO_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ProxyError::MissingApiKey)?;

        Ok(Self {
            api_key,
            game_id: parse_var(&get, "MODIO_GAME_ID", DEFAULT_GAME_ID)?,
            api_base: get("MODIO_API_BASE"),
            cache_ttl: Duration::from_secs(parse_var(&get, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?),
            rate_limit_requests: parse_var(&get, "RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS)?,
            rate_limit_window: Duration::from_secs(parse_var(
                &get,
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?),
            request_timeout: Duration::from_secs(parse_var(
                &get,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            port: parse_var(&get, "PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_var<F, T>(get: &F, key: &str, default: T) -> Result<T, ProxyError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ProxyError::InvalidConfig(format!("{}={}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let result = ProxyConfig::from_source(source(&[]));
        assert!(matches!(result, Err(ProxyError::MissingApiKey)));
    }

    #[test]
    fn empty_api_key_is_fatal() {
        let result = ProxyConfig::from_source(source(&[("MODIO_KEY", "")]));
        assert!(matches!(result, Err(ProxyError::MissingApiKey)));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = ProxyConfig::from_source(source(&[("MODIO_KEY", "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.game_id, DEFAULT_GAME_ID);
        assert_eq!(config.api_base, None);
        assert_eq!(config.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
        assert_eq!(config.rate_limit_requests, DEFAULT_RATE_LIMIT_REQUESTS);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn env_overrides_are_honored() {
        let config = ProxyConfig::from_source(source(&[
            ("MODIO_KEY", "secret"),
            ("MODIO_GAME_ID", "777"),
            ("MODIO_API_BASE", "http://127.0.0.1:8081/v1"),
            ("CACHE_TTL_SECS", "30"),
            ("RATE_LIMIT_REQUESTS", "5"),
            ("RATE_LIMIT_WINDOW_SECS", "10"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.game_id, 777);
        assert_eq!(config.api_base.as_deref(), Some("http://127.0.0.1:8081/v1"));
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.rate_limit_requests, 5);
        assert_eq!(config.rate_limit_window, Duration::from_secs(10));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn malformed_numeric_is_fatal() {
        let result =
            ProxyConfig::from_source(source(&[("MODIO_KEY", "secret"), ("CACHE_TTL_SECS", "soon")]));
        assert!(matches!(result, Err(ProxyError::InvalidConfig(_))));
    }
}
