use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod levels_client;
pub mod logging;
pub mod mcp;

use levels_client::LevelsGenerator;

#[derive(Clone)]
pub struct AppState {
    pub levels_generator: Arc<dyn LevelsGenerator>,
}

impl AppState {
    pub fn new(levels_generator: Arc<dyn LevelsGenerator>) -> Self {
        Self { levels_generator }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route(
            http::handlers::MCP_ENDPOINT,
            get(http::handlers::mcp_events).post(http::handlers::mcp_endpoint),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
