use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::{Body, Client, Request};
use hyper_tls::HttpsConnector;
use tokio::time::timeout;
use url::Url;

use crate::config::USER_AGENT;
use crate::errors::ProxyError;
use crate::models::{ModQuery, UpstreamPayload};

/// Issues the single outbound request for a cache miss, carrying the hidden
/// API key. The key exists only in the outbound URL; it is never logged and
/// never part of the returned payload.
pub struct UpstreamClient {
    http: Client<HttpsConnector<HttpConnector>>,
    api_key: String,
    base_override: Option<String>,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(api_key: String, base_override: Option<String>, timeout: Duration) -> Self {
        Self {
            http: Client::builder().build(HttpsConnector::new()),
            api_key,
            base_override,
            timeout,
        }
    }

    /// One GET, no retries. Any response upstream produces is normalized and
    /// returned as-is; transport-level failures (connect error, timeout,
    /// truncated body) all collapse into `UpstreamUnreachable`.
    pub async fn fetch(&self, query: &ModQuery) -> Result<UpstreamPayload, ProxyError> {
        let url = self.endpoint(query)?;
        tracing::debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "forwarding catalog request upstream"
        );

        let request = Request::get(url.as_str())
            .header(http::header::USER_AGENT, USER_AGENT)
            .body(Body::empty())
            .map_err(|e| ProxyError::Http(e.to_string()))?;

        let response = match timeout(self.timeout, self.http.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "upstream request failed");
                return Err(ProxyError::UpstreamUnreachable);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "upstream request timed out"
                );
                return Err(ProxyError::UpstreamUnreachable);
            }
        };

        let (parts, body) = response.into_parts();
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = hyper::body::to_bytes(body).await.map_err(|e| {
            tracing::warn!(error = %e, "failed reading upstream response body");
            ProxyError::UpstreamUnreachable
        })?;

        Ok(UpstreamPayload {
            status: parts.status,
            content_type,
            body,
        })
    }

    /// mod.io serves each game's catalog from a per-game domain; the whole
    /// base can be overridden to point elsewhere (staging, tests).
    fn endpoint(&self, query: &ModQuery) -> Result<Url, ProxyError> {
        let base = match &self.base_override {
            Some(base) => base.clone(),
            None => format!("https://g-{}.modapi.io/v1", query.game_id),
        };
        let mut url = Url::parse(&base).map_err(|e| ProxyError::InvalidUri(e.to_string()))?;
        let game_id = query.game_id.to_string();
        url.path_segments_mut()
            .map_err(|_| ProxyError::InvalidUri(base.clone()))?
            .pop_if_empty()
            .extend(["games", game_id.as_str(), "mods"]);
        if let Some(fields) = &query.fields {
            url.query_pairs_mut().append_pair("_fields", &fields.join(","));
        }
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }
}
