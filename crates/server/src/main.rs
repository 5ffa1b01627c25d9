use server::{AppState, Config, build_router};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let config = Config::from_env();
    if config.api_key.is_none() {
        warn!("DGIS_API_KEY is not set, details and routing will answer 500");
    }
    let port = config.port;
    let state = Arc::new(AppState::new(config));

    let app = build_router(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
        std::process::exit(1);
    }
}
