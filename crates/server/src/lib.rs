//! HTTP backend that sits next to the map view: health check, a proxy for
//! place details and a proxy that turns provider routes into
//! `map:draw-route` payloads.

pub mod api;
pub mod config;
pub mod upstream;

use std::sync::Arc;

use axum::routing::{get, post};

pub use config::Config;
use upstream::DgisClient;

pub struct AppState {
    pub config: Config,
    pub client: DgisClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = DgisClient::new(&config);
        Self { config, client }
    }
}

pub fn build_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/health", get(api::health))
        .route("/api/2gis/details", post(api::details))
        .route("/api/route", post(api::route))
        .with_state(state)
}
