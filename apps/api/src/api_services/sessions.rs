use rolegate_core::AppError;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};

use crate::redis_session_store::RedisSessionStore;

const SESSION_KEY_PREFIX: &str = "rolegate:session";
const SESSION_IDLE_MINUTES: i64 = 30;

pub fn build_memory_session_layer(cookie_secure: bool) -> SessionManagerLayer<MemoryStore> {
    tracing::warn!("using in-memory sessions; sign-ins are lost on restart");
    with_cookie_policy(SessionManagerLayer::new(MemoryStore::default()), cookie_secure)
}

pub fn build_redis_client(redis_url: &str) -> Result<redis::Client, AppError> {
    redis::Client::open(redis_url)
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))
}

pub fn build_redis_session_layer(
    redis_client: redis::Client,
    cookie_secure: bool,
) -> SessionManagerLayer<RedisSessionStore> {
    let session_store = RedisSessionStore::new(redis_client, SESSION_KEY_PREFIX);
    with_cookie_policy(SessionManagerLayer::new(session_store), cookie_secure)
}

fn with_cookie_policy<Store: SessionStore>(
    layer: SessionManagerLayer<Store>,
    cookie_secure: bool,
) -> SessionManagerLayer<Store> {
    layer
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            SESSION_IDLE_MINUTES,
        )))
}
