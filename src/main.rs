use std::sync::Arc;

use realentless_mcp::{
    build_app, config::Config, levels_client::HttpLevelsGenerator, logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let generator = Arc::new(HttpLevelsGenerator::new(config.levels_backend_url.clone()));
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(generator);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        levels_backend = %config.levels_backend_url,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
