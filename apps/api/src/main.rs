//! Bruteguard API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use bruteguard_application::DecisionEngine;
use bruteguard_core::AppError;
use bruteguard_infrastructure::RedisCounterStore;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

/// Namespace prefix for every key this service owns in the store.
const KEY_PREFIX: &str = "bruteguard";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let limits = config.limits()?;

    let redis_client = redis::Client::open(config.redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
    let store = Arc::new(RedisCounterStore::new(redis_client, KEY_PREFIX));

    let app_state = AppState {
        engine: DecisionEngine::new(store, limits),
    };

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/check-auth", post(handlers::auth::check_auth_handler))
        .route(
            "/api/reset-bucket",
            post(handlers::auth::reset_bucket_handler),
        )
        .route(
            "/api/blacklist",
            post(handlers::lists::add_to_blacklist_handler)
                .delete(handlers::lists::remove_from_blacklist_handler),
        )
        .route(
            "/api/whitelist",
            post(handlers::lists::add_to_whitelist_handler)
                .delete(handlers::lists::remove_from_whitelist_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        login_limit = config.login_limit,
        credential_limit = config.credential_limit,
        address_limit = config.address_limit,
        window_seconds = config.window_seconds,
        "bruteguard-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
