//! Role management API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod html;
mod middleware;
mod redis_session_store;
mod state;

use rolegate_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, SessionStoreKind, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_app_state, build_memory_session_layer, build_redis_client, build_redis_session_layer,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let address = config.socket_address()?;
    let app_state = build_app_state(&config).await?;

    let app = match (config.session_store, config.redis_url.as_deref()) {
        (SessionStoreKind::Redis, Some(redis_url)) => {
            let redis_client = build_redis_client(redis_url)?;
            build_router(
                app_state,
                build_redis_session_layer(redis_client, config.cookie_secure),
            )
        }
        (SessionStoreKind::Redis, None) => {
            return Err(AppError::Validation(
                "REDIS_URL is required when SESSION_STORE=redis".to_owned(),
            ));
        }
        (SessionStoreKind::Memory, _) => build_router(
            app_state,
            build_memory_session_layer(config.cookie_secure),
        ),
    };

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        session_store = ?config.session_store,
        role_api_require_login = config.role_api_require_login,
        "rolegate-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
