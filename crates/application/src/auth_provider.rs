//! Interactive sign-in port.
//!
//! PKCE, nonce and state validation are the provider library's job; this
//! module only describes what crosses the session boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rolegate_core::{AppResult, UserIdentity};

/// Login state kept in the session between redirect and callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    /// Anti-forgery `state` parameter.
    pub csrf_state: String,
    /// Nonce bound into the ID token.
    pub nonce: String,
    /// PKCE code verifier.
    pub pkce_verifier: String,
    /// Redirect URI registered for this attempt.
    pub redirect_uri: String,
}

/// Result of starting a login.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    /// Provider authorization URL the browser is sent to.
    pub authorization_url: String,
    /// State to persist until the callback arrives.
    pub pending: PendingLogin,
}

/// Query parameters the provider sends back to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginCallback {
    /// Authorization code.
    pub code: Option<String>,
    /// Echoed anti-forgery state.
    pub state: Option<String>,
    /// Provider error code.
    pub error: Option<String>,
    /// Provider error description.
    pub error_description: Option<String>,
}

/// Delegated access token for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccessToken {
    /// Bearer secret.
    pub secret: String,
    /// Expiry as unix seconds, when the provider reported one.
    pub expires_at: Option<i64>,
}

impl UserAccessToken {
    /// Returns whether the token is expired at `now_unix`.
    #[must_use]
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now_unix)
    }
}

/// Outcome of a successful callback.
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    /// Verified identity claims.
    pub identity: UserIdentity,
    /// Access token for downstream API calls.
    pub access_token: UserAccessToken,
}

/// Identity provider capability used by the login endpoints.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Builds the provider authorization URL for a new login.
    fn begin_login(&self, redirect_uri: &str) -> AppResult<LoginRedirect>;

    /// Exchanges the callback code and validates the returned ID token.
    async fn complete_login(
        &self,
        pending: PendingLogin,
        callback: LoginCallback,
    ) -> AppResult<CompletedLogin>;

    /// Returns the provider end-session URL.
    fn logout_url(&self, post_logout_redirect_uri: &str) -> AppResult<String>;
}
