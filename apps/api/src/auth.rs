mod login;
mod pages;

use rolegate_core::{AppError, AppResult, UserIdentity};
use tower_sessions::Session;

pub use login::{auth_response_handler, login_handler, logout_handler};
pub use pages::{call_downstream_api_handler, index_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
const SESSION_PENDING_LOGIN_KEY: &str = "pending_login";
const SESSION_ACCESS_TOKEN_KEY: &str = "user_access_token";

/// Returns the signed-in user, or `None` for an anonymous session.
pub async fn current_user(session: &Session) -> AppResult<Option<UserIdentity>> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}
