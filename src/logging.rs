use std::time::Instant;

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// JSON-RPC method of a POST `/mcp` call, attached to the response by the
/// handler so the request summary can name it.
#[derive(Debug, Clone)]
pub struct RpcMethod(pub String);

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let http_method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started_at.elapsed().as_millis();

    let is_event_stream = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"text/event-stream"));
    if is_event_stream {
        debug!(path = %path, "event stream opened");
    }

    match response.extensions().get::<RpcMethod>() {
        Some(RpcMethod(rpc_method)) => info!(
            http_method = %http_method,
            path = %path,
            rpc_method = %rpc_method,
            status,
            duration_ms = elapsed_ms,
            "rpc request summary"
        ),
        None => info!(
            http_method = %http_method,
            path = %path,
            status,
            duration_ms = elapsed_ms,
            "request summary"
        ),
    }

    if !response.status().is_success() {
        warn!(http_method = %http_method, path = %path, status, "request not served");
    }

    response
}
