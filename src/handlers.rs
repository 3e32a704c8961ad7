use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;

use hyper::StatusCode;
use warp::{Filter, Reply};

use crate::errors::ProxyError;
use crate::middleware::add_cors_headers;
use crate::models::{ModQuery, ModsParams};
use crate::services::Dispatcher;


/// Builds the complete filter chain: the catalog endpoint plus a health
/// probe, with rejection recovery applied.
pub fn routes(
    dispatcher: Arc<Dispatcher>,
    default_game_id: u32,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let dispatcher = warp::any().map(move || dispatcher.clone());

    let health = warp::path("health").and(warp::get()).map(|| "OK");

    let mods = warp::path!("api" / "mods")
        .and(warp::get())
        .and(warp::query::<ModsParams>())
        .and(warp::header::optional::<String>("x-forwarded-for"))
        .and(warp::addr::remote())
        .and(dispatcher)
        .and_then(
            move |params: ModsParams,
                  forwarded: Option<String>,
                  addr: Option<SocketAddr>,
                  dispatcher: Arc<Dispatcher>| async move {
                let client = client_key(forwarded.as_deref(), addr);
                let query = ModQuery::new(
                    params.game_id.unwrap_or(default_game_id),
                    params.fields.as_deref(),
                );
                let game_id = query.game_id;
                let started = SystemTime::now();

                match dispatcher.handle(&client, query, started).await {
                    Ok(mut response) => {
                        add_cors_headers(response.headers_mut());
                        let elapsed_ms =
                            started.elapsed().map(|e| e.as_millis() as u64).unwrap_or(0);
                        tracing::info!(
                            client = %client,
                            game_id,
                            status = %response.status(),
                            elapsed_ms,
                            "GET /api/mods"
                        );
                        Ok(response)
                    }
                    Err(e) => Err(warp::reject::custom(e)),
                }
            },
        );

    health.or(mods).recover(handle_rejection)
}

/// Clients are bucketed by the forwarded-for header when a proxy fronts us,
/// falling back to the peer address, then to a shared bucket so requests with
/// no discernible identity still count against a limit.
pub fn client_key(forwarded: Option<&str>, addr: Option<SocketAddr>) -> String {
    if let Some(forwarded) = forwarded {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    match addr {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if let Some(e) = err.find::<ProxyError>() {
        match e {
            ProxyError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
            }
            ProxyError::UpstreamUnreachable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Proxy request failed")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    let body = warp::reply::json(&serde_json::json!({ "error": message }));
    Ok(warp::reply::with_status(body, code))
}
