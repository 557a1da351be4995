use std::sync::Arc;

use rolegate_application::{AuthProvider, RoleReconciliationService};
use url::Url;

#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleReconciliationService,
    pub auth_provider: Arc<dyn AuthProvider>,
    pub downstream_client: reqwest::Client,
    pub downstream_api_endpoint: Url,
    pub redirect_path: String,
    pub redirect_uri: String,
    pub home_url: String,
    pub role_api_require_login: bool,
}
