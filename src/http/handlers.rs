//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint (JSON-RPC over POST, keepalive
//! event stream over GET), and general metadata endpoints.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::errors::RpcFault;
use crate::logging::RpcMethod;
use crate::mcp::rpc::RpcResponse;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

pub const MCP_ENDPOINT: &str = "/mcp";
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: MCP_ENDPOINT,
    })
}

/// JSON-RPC over POST. Always HTTP 200; faults travel in the envelope.
pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            error!(error = %err, "failed to parse json-rpc body");
            return Json(RpcResponse::fault(
                Value::Null,
                &RpcFault::internal(err.to_string()),
            ))
            .into_response();
        }
    };

    let rpc_method = payload
        .get("method")
        .and_then(Value::as_str)
        .map(|method| RpcMethod(method.to_string()));

    let mut response = Json(handle_json_rpc_value(&state, payload).await).into_response();
    if let Some(rpc_method) = rpc_method {
        response.extensions_mut().insert(rpc_method);
    }
    response
}

struct StreamGuard;

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!("sse client disconnected");
    }
}

/// Keepalive event stream: one `connected` event, then a comment frame every
/// 30 seconds until the client goes away.
pub async fn mcp_events() -> impl IntoResponse {
    debug!("sse client connected");

    let guard = StreamGuard;
    let events = stream::once(async { Event::default().json_data(json!({ "event": "connected" })) })
        .chain(stream::pending())
        .map(move |event| {
            let _guard = &guard;
            event
        });

    let sse = Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEPALIVE_INTERVAL)
            .text("keepalive"),
    );

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Cache-Control"),
        ],
        sse,
    )
}
