//! Discovered OpenID Connect client shared by the login and token adapters.

use std::time::Duration;

use openidconnect::core::{CoreClient, CoreProviderMetadata};
use openidconnect::reqwest;
use openidconnect::{ClientId, ClientSecret, EndpointMaybeSet, EndpointNotSet, EndpointSet, IssuerUrl};

use rolegate_core::{AppError, AppResult};

pub(crate) type DiscoveredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Confidential client registration at the identity provider.
#[derive(Debug, Clone)]
pub struct OidcClientSettings {
    /// Issuer URL used for discovery.
    pub issuer_url: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Upper bound for each request to the provider.
    pub request_timeout: Duration,
}

/// Provider metadata plus the HTTP client used to talk to the provider.
#[derive(Clone)]
pub struct OidcProviderClient {
    pub(crate) client: DiscoveredClient,
    pub(crate) http_client: reqwest::Client,
}

impl OidcProviderClient {
    /// Fetches the provider metadata and signing keys.
    pub async fn discover(settings: OidcClientSettings) -> AppResult<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(settings.request_timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build identity provider client: {error}"))
            })?;

        let issuer_url = IssuerUrl::new(settings.issuer_url.clone()).map_err(|error| {
            AppError::Validation(format!(
                "invalid issuer url '{}': {error}",
                settings.issuer_url
            ))
        })?;

        let metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|error| {
                AppError::Upstream(format!(
                    "identity provider discovery failed for '{}': {error}",
                    settings.issuer_url
                ))
            })?;

        tracing::info!(issuer = %settings.issuer_url, "identity provider metadata discovered");

        let client = CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(settings.client_id),
            Some(ClientSecret::new(settings.client_secret)),
        );

        Ok(Self {
            client,
            http_client,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::{OidcClientSettings, OidcProviderClient};

    pub(crate) const TENANT_PATH: &str = "/tenant-1";

    pub(crate) fn issuer(server: &MockServer) -> String {
        server.url(format!("{TENANT_PATH}/v2.0"))
    }

    /// Serves discovery metadata and an empty key set, then discovers.
    pub(crate) async fn discovered_provider(server: &MockServer) -> OidcProviderClient {
        discovered_provider_with_timeout(server, Duration::from_secs(5)).await
    }

    pub(crate) async fn discovered_provider_with_timeout(
        server: &MockServer,
        request_timeout: Duration,
    ) -> OidcProviderClient {
        let issuer = issuer(server);
        let metadata = json!({
            "issuer": issuer,
            "authorization_endpoint": server.url(format!("{TENANT_PATH}/oauth2/v2.0/authorize")),
            "token_endpoint": server.url(format!("{TENANT_PATH}/oauth2/v2.0/token")),
            "jwks_uri": server.url(format!("{TENANT_PATH}/discovery/v2.0/keys")),
            "response_types_supported": ["code"],
            "subject_types_supported": ["pairwise"],
            "id_token_signing_alg_values_supported": ["RS256"]
        });

        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("{TENANT_PATH}/v2.0/.well-known/openid-configuration"));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(metadata);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("{TENANT_PATH}/discovery/v2.0/keys"));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"keys": []}));
            })
            .await;

        OidcProviderClient::discover(OidcClientSettings {
            issuer_url: issuer,
            client_id: "client-1".to_owned(),
            client_secret: "secret-1".to_owned(),
            request_timeout,
        })
        .await
        .unwrap_or_else(|error| panic!("discovery should succeed: {error}"))
    }
}
