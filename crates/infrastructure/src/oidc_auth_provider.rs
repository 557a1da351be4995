//! Authorization code login against an OpenID Connect provider.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use openidconnect::core::{CoreAuthenticationFlow, CoreIdTokenClaims};
use openidconnect::{
    AuthorizationCode, CsrfToken, Nonce, OAuth2TokenResponse, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use url::Url;

use rolegate_application::{
    AuthProvider, CompletedLogin, LoginCallback, LoginRedirect, PendingLogin, UserAccessToken,
};
use rolegate_core::{AppError, AppResult, UserIdentity};

use crate::OidcProviderClient;
use crate::oidc_provider_client::DiscoveredClient;

/// Scopes requested on every login in addition to `openid`.
const DEFAULT_SCOPES: [&str; 2] = ["profile", "email"];

/// OpenID Connect implementation of the login port.
pub struct OidcAuthProvider {
    provider: Arc<OidcProviderClient>,
    scopes: Vec<String>,
    logout_endpoint: Url,
}

impl OidcAuthProvider {
    /// Creates a provider requesting the default scopes plus `extra_scopes`.
    #[must_use]
    pub fn new(
        provider: Arc<OidcProviderClient>,
        extra_scopes: Vec<String>,
        logout_endpoint: Url,
    ) -> Self {
        let mut scopes: Vec<String> = DEFAULT_SCOPES
            .iter()
            .map(|scope| (*scope).to_owned())
            .collect();
        for scope in extra_scopes {
            let scope = scope.trim();
            if scope.is_empty() || scope == "openid" || scopes.iter().any(|seen| seen == scope) {
                continue;
            }
            scopes.push(scope.to_owned());
        }

        Self {
            provider,
            scopes,
            logout_endpoint,
        }
    }

    fn client_for(&self, redirect_uri: &str) -> AppResult<DiscoveredClient> {
        let redirect_url = RedirectUrl::new(redirect_uri.to_owned()).map_err(|error| {
            AppError::Configuration(format!("invalid redirect uri '{redirect_uri}': {error}"))
        })?;
        Ok(self.provider.client.clone().set_redirect_uri(redirect_url))
    }
}

#[async_trait]
impl AuthProvider for OidcAuthProvider {
    fn begin_login(&self, redirect_uri: &str) -> AppResult<LoginRedirect> {
        let client = self.client_for(redirect_uri)?;
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (authorization_url, csrf_token, nonce) = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok(LoginRedirect {
            authorization_url: authorization_url.to_string(),
            pending: PendingLogin {
                csrf_state: csrf_token.secret().clone(),
                nonce: nonce.secret().clone(),
                pkce_verifier: pkce_verifier.into_secret(),
                redirect_uri: redirect_uri.to_owned(),
            },
        })
    }

    async fn complete_login(
        &self,
        pending: PendingLogin,
        callback: LoginCallback,
    ) -> AppResult<CompletedLogin> {
        if let Some(error) = callback.error {
            let detail = match callback.error_description {
                Some(description) => format!("{error}: {description}"),
                None => error,
            };
            return Err(AppError::Unauthorized(format!(
                "identity provider rejected the login: {detail}"
            )));
        }

        if callback.state.as_deref() != Some(pending.csrf_state.as_str()) {
            return Err(AppError::Unauthorized("login state mismatch".to_owned()));
        }

        let code = callback
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::Unauthorized("authorization code missing".to_owned()))?;

        let client = self.client_for(&pending.redirect_uri)?;
        let token_response = client
            .exchange_code(AuthorizationCode::new(code))
            .map_err(|error| {
                AppError::Internal(format!("token endpoint is not available: {error}"))
            })?
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier))
            .request_async(&self.provider.http_client)
            .await
            .map_err(|error| AppError::Unauthorized(format!("code exchange failed: {error}")))?;

        let id_token = token_response.id_token().ok_or_else(|| {
            AppError::Unauthorized("identity provider returned no id token".to_owned())
        })?;
        let claims = id_token
            .claims(&client.id_token_verifier(), &Nonce::new(pending.nonce))
            .map_err(|error| AppError::Unauthorized(format!("invalid id token: {error}")))?;

        let identity = identity_from_claims(claims);
        let expires_at = token_response.expires_in().map(|lifetime| {
            let seconds = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
            Utc::now().timestamp().saturating_add(seconds)
        });

        tracing::info!(subject = identity.subject(), "user signed in");

        Ok(CompletedLogin {
            identity,
            access_token: UserAccessToken {
                secret: token_response.access_token().secret().clone(),
                expires_at,
            },
        })
    }

    fn logout_url(&self, post_logout_redirect_uri: &str) -> AppResult<String> {
        Url::parse(post_logout_redirect_uri).map_err(|error| {
            AppError::Configuration(format!(
                "invalid post logout redirect uri '{post_logout_redirect_uri}': {error}"
            ))
        })?;

        let mut url = self.logout_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("post_logout_redirect_uri", post_logout_redirect_uri);
        Ok(url.into())
    }
}

fn identity_from_claims(claims: &CoreIdTokenClaims) -> UserIdentity {
    let email = claims
        .email()
        .map(|email| email.as_str().to_owned())
        .or_else(|| {
            claims
                .preferred_username()
                .map(|username| username.as_str().to_owned())
        });
    let display_name = claims
        .name()
        .and_then(|name| name.get(None))
        .map(|name| name.as_str().to_owned())
        .or_else(|| email.clone())
        .unwrap_or_else(|| claims.subject().as_str().to_owned());

    UserIdentity::new(claims.subject().as_str(), display_name, email)
}
