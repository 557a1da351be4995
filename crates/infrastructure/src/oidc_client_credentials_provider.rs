//! Application-only access tokens for the directory API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use openidconnect::{OAuth2TokenResponse, Scope};
use tokio::sync::Mutex;
use tokio::time::Instant;

use rolegate_application::AccessTokenProvider;
use rolegate_core::{AppError, AppResult};

use crate::OidcProviderClient;

/// Cached tokens this close to expiry are refreshed.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

struct CachedToken {
    secret: String,
    expires_at: Instant,
}

/// Client credentials grant with an in-process silent cache.
pub struct OidcClientCredentialsProvider {
    provider: Arc<OidcProviderClient>,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl OidcClientCredentialsProvider {
    /// Creates a provider requesting `scope`, usually `<resource>/.default`.
    #[must_use]
    pub fn new(provider: Arc<OidcProviderClient>, scope: impl Into<String>) -> Self {
        Self {
            provider,
            scope: scope.into(),
            cached: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> AppResult<CachedToken> {
        let response = self
            .provider
            .client
            .exchange_client_credentials()
            .map_err(|error| {
                AppError::Unauthorized(format!("token endpoint is not available: {error}"))
            })?
            .add_scope(Scope::new(self.scope.clone()))
            .request_async(&self.provider.http_client)
            .await
            .map_err(|error| {
                AppError::Unauthorized(format!("client credentials grant failed: {error}"))
            })?;

        let secret = response.access_token().secret().clone();
        if secret.is_empty() {
            return Err(AppError::Unauthorized(
                "token endpoint returned an empty access token".to_owned(),
            ));
        }

        let now = Instant::now();
        let lifetime = response.expires_in().unwrap_or_default();
        Ok(CachedToken {
            secret,
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for OidcClientCredentialsProvider {
    async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now() + EXPIRY_SKEW
        {
            return Ok(token.secret.clone());
        }

        let token = self.request_token().await?;
        tracing::debug!(scope = %self.scope, "acquired directory access token");
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use httpmock::prelude::*;
    use serde_json::json;

    use rolegate_application::AccessTokenProvider;
    use rolegate_core::AppError;

    use super::OidcClientCredentialsProvider;
    use crate::oidc_provider_client::test_support::{
        TENANT_PATH, discovered_provider, discovered_provider_with_timeout,
    };

    const SCOPE: &str = "https://graph.microsoft.com/.default";

    #[tokio::test]
    async fn unexpired_token_is_served_from_cache() {
        let server = MockServer::start_async().await;
        let provider = discovered_provider(&server).await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{TENANT_PATH}/oauth2/v2.0/token"));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                    "access_token": "app-token",
                    "token_type": "Bearer",
                    "expires_in": 3600
                }));
            })
            .await;

        let tokens = OidcClientCredentialsProvider::new(Arc::new(provider), SCOPE);
        let first = tokens.access_token().await;
        let second = tokens.access_token().await;

        assert_eq!(first.ok().as_deref(), Some("app-token"));
        assert_eq!(second.ok().as_deref(), Some("app-token"));
        token_mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_grant_is_unauthorized() {
        let server = MockServer::start_async().await;
        let provider = discovered_provider(&server).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{TENANT_PATH}/oauth2/v2.0/token"));
                then.status(401)
                    .header("content-type", "application/json")
                    .json_body(json!({
                    "error": "invalid_client",
                    "error_description": "bad secret"
                }));
            })
            .await;

        let tokens = OidcClientCredentialsProvider::new(Arc::new(provider), SCOPE);
        let result = tokens.access_token().await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn slow_token_endpoint_times_out() {
        let server = MockServer::start_async().await;
        let provider = discovered_provider_with_timeout(&server, Duration::from_millis(300)).await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{TENANT_PATH}/oauth2/v2.0/token"));
                then.status(200)
                    .delay(Duration::from_secs(5))
                    .header("content-type", "application/json")
                    .json_body(json!({
                    "access_token": "app-token",
                    "token_type": "Bearer",
                    "expires_in": 3600
                }));
            })
            .await;

        let tokens = OidcClientCredentialsProvider::new(Arc::new(provider), SCOPE);
        let started = Instant::now();
        let result = tokens.access_token().await;

        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
