use std::sync::Arc;
use std::time::Duration;

use rolegate_application::RoleReconciliationService;
use rolegate_core::AppError;
use rolegate_infrastructure::{
    GraphRoleDirectory, OidcAuthProvider, OidcClientCredentialsProvider, OidcClientSettings,
    OidcProviderClient,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

const DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Discovers the identity provider and wires the adapters behind the ports.
pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let provider = Arc::new(
        OidcProviderClient::discover(OidcClientSettings {
            issuer_url: config.oidc.issuer_url.clone(),
            client_id: config.oidc.client_id.clone(),
            client_secret: config.oidc.client_secret.clone(),
            request_timeout: config.directory_timeout,
        })
        .await?,
    );

    let directory_tokens = Arc::new(OidcClientCredentialsProvider::new(
        provider.clone(),
        config.directory_scope.clone(),
    ));
    let directory = GraphRoleDirectory::new(
        config.graph_api_base_url.clone(),
        directory_tokens,
        config.directory_timeout,
    )?;

    if config.service_principal_id.is_none() {
        tracing::warn!("SERVICE_PRINCIPAL_ID is not set; role endpoints will reject requests");
    }
    let role_service =
        RoleReconciliationService::new(Arc::new(directory), config.service_principal_id.clone());

    let auth_provider = OidcAuthProvider::new(
        provider,
        config.oidc.extra_scopes.clone(),
        config.oidc.logout_url.clone(),
    );

    let downstream_client = reqwest::Client::builder()
        .timeout(DOWNSTREAM_TIMEOUT)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build downstream client: {error}")))?;

    Ok(AppState {
        role_service,
        auth_provider: Arc::new(auth_provider),
        downstream_client,
        downstream_api_endpoint: config.downstream_api_endpoint.clone(),
        redirect_path: config.oidc.redirect_path.clone(),
        redirect_uri: config.redirect_uri()?,
        home_url: config.home_url()?,
        role_api_require_login: config.role_api_require_login,
    })
}
