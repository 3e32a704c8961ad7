use std::time::SystemTime;

use bytes::Bytes;
use http::StatusCode;
use hyper::{Body, Response};
use serde::Deserialize;

use crate::errors::ProxyError;

/// Raw query parameters accepted by `GET /api/mods`.
#[derive(Debug, Deserialize)]
pub struct ModsParams {
    pub game_id: Option<u32>,
    pub fields: Option<String>,
}

/// Normalized identity of one catalog request; doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModQuery {
    pub game_id: u32,
    pub fields: Option<Vec<String>>,
}

impl ModQuery {
    /// Field selections are trimmed, deduplicated and sorted so that
    /// `fields=name,summary` and `fields=summary, name` share one cache entry.
    pub fn new(game_id: u32, fields: Option<&str>) -> Self {
        let fields = fields.and_then(|raw| {
            let mut list: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect();
            list.sort();
            list.dedup();
            if list.is_empty() {
                None
            } else {
                Some(list)
            }
        });
        Self { game_id, fields }
    }
}

/// One normalized upstream response: status and body verbatim, content type
/// defaulting to JSON when upstream omits it.
#[derive(Clone)]
pub struct UpstreamPayload {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl UpstreamPayload {
    /// `cache_status` ends up in an `x-cache` header, for observability only.
    pub fn into_response(self, cache_status: &'static str) -> Result<Response<Body>, ProxyError> {
        Response::builder()
            .status(self.status)
            .header(http::header::CONTENT_TYPE, self.content_type.as_str())
            .header("x-cache", cache_status)
            .body(Body::from(self.body))
            .map_err(|e| ProxyError::Http(e.to_string()))
    }
}

pub struct CacheEntry {
    pub payload: UpstreamPayload,
    pub stored_at: SystemTime,
}

pub struct RateWindow {
    pub count: u32,
    pub window_start: SystemTime,
}
