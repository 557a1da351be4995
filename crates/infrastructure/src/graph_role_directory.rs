//! Microsoft Graph shaped role directory client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use rolegate_application::{AccessTokenProvider, NewRoleAssignment, RoleDirectory};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{AppRole, DirectoryUser, EmailAddress, RoleAssignment, ServicePrincipal};

/// HTTP implementation of the role directory port.
#[derive(Clone)]
pub struct GraphRoleDirectory {
    http_client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn AccessTokenProvider>,
    timeout: Duration,
}

impl GraphRoleDirectory {
    /// Creates a client for the directory API rooted at `base_url`.
    ///
    /// `timeout` bounds token acquisition and each directory request separately.
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn AccessTokenProvider>,
        timeout: Duration,
    ) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "directory base url '{base_url}' cannot carry a path"
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build directory http client: {error}"))
            })?;

        Ok(Self {
            http_client,
            base_url,
            tokens,
            timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "directory base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let token = tokio::time::timeout(self.timeout, self.tokens.access_token())
            .await
            .map_err(|_| {
                AppError::Upstream("timed out acquiring a directory access token".to_owned())
            })??;
        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("directory transport error: {error}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let response = self.send(self.http_client.get(url)).await?;
        let response = ensure_success(response).await?;
        decode(response).await
    }
}

#[derive(Debug, Deserialize)]
struct GraphCollection<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppRoleRow {
    id: String,
    display_name: Option<String>,
    description: Option<String>,
    value: Option<String>,
    #[serde(default = "enabled_by_default")]
    is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TryFrom<AppRoleRow> for AppRole {
    type Error = AppError;

    fn try_from(row: AppRoleRow) -> Result<Self, Self::Error> {
        Ok(AppRole::new(row.id, row.display_name.unwrap_or_default())?.with_details(
            row.description,
            row.value,
            row.is_enabled,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRow {
    id: String,
    app_role_id: String,
    principal_id: String,
    principal_display_name: Option<String>,
    principal_type: Option<String>,
    resource_id: String,
    resource_display_name: Option<String>,
    created_date_time: Option<String>,
}

impl From<AssignmentRow> for RoleAssignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            app_role_id: row.app_role_id,
            principal_id: row.principal_id,
            principal_display_name: row.principal_display_name,
            principal_type: row.principal_type,
            resource_id: row.resource_id,
            resource_display_name: row.resource_display_name,
            created_date_time: row.created_date_time,
        }
    }
}

/// Body of a created assignment. Every field is optional so that a short
/// response never turns a created assignment into a failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CreatedAssignmentRow {
    id: Option<String>,
    principal_display_name: Option<String>,
    principal_type: Option<String>,
    resource_display_name: Option<String>,
    created_date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRow {
    id: Option<String>,
    display_name: Option<String>,
    user_principal_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServicePrincipalRow {
    id: String,
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssignmentBody<'a> {
    principal_id: &'a str,
    resource_id: &'a str,
    app_role_id: &'a str,
}

async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
    Err(AppError::Upstream(format!("{} {body}", status.as_u16())))
}

/// Accepts only `expected`; any other status, 2xx included, is an upstream failure.
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Upstream(format!(
        "{} {body} (expected {})",
        status.as_u16(),
        expected.as_u16()
    )))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    response.json::<T>().await.map_err(|error| {
        AppError::Upstream(format!("failed to decode directory response: {error}"))
    })
}

mod reads;
#[cfg(test)]
mod tests;
mod writes;

#[async_trait]
impl RoleDirectory for GraphRoleDirectory {
    async fn list_app_roles(&self, resource_id: &str) -> AppResult<Vec<AppRole>> {
        self.list_app_roles_impl(resource_id).await
    }

    async fn list_assignments(&self, resource_id: &str) -> AppResult<Vec<RoleAssignment>> {
        self.list_assignments_impl(resource_id).await
    }

    async fn service_principal(&self, resource_id: &str) -> AppResult<ServicePrincipal> {
        self.service_principal_impl(resource_id).await
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<DirectoryUser>> {
        self.find_user_by_email_impl(email).await
    }

    async fn list_user_assignments(&self, user_id: &str) -> AppResult<Vec<RoleAssignment>> {
        self.list_user_assignments_impl(user_id).await
    }

    async fn create_assignment(&self, request: NewRoleAssignment) -> AppResult<RoleAssignment> {
        self.create_assignment_impl(request).await
    }

    async fn delete_assignment(&self, resource_id: &str, assignment_id: &str) -> AppResult<()> {
        self.delete_assignment_impl(resource_id, assignment_id).await
    }
}
