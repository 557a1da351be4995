use async_trait::async_trait;

use rolegate_core::AppResult;
use rolegate_domain::{AppRole, DirectoryUser, EmailAddress, RoleAssignment, ServicePrincipal};

/// Source of bearer tokens for the directory API.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a token, reusing a cached one when it is still valid.
    ///
    /// Fails with `AppError::Unauthorized` when the provider rejects the
    /// client credentials or returns no access token.
    async fn access_token(&self) -> AppResult<String>;
}

/// Request to create one role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoleAssignment {
    /// User receiving the role.
    pub principal_id: String,
    /// Service principal owning the role.
    pub resource_id: String,
    /// Role to assign.
    pub app_role_id: String,
}

/// Port for the directory's role-management API.
///
/// Collections are read in a single page.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Lists the role definitions of a service principal.
    async fn list_app_roles(&self, resource_id: &str) -> AppResult<Vec<AppRole>>;

    /// Lists every assignment granted on a service principal.
    async fn list_assignments(&self, resource_id: &str) -> AppResult<Vec<RoleAssignment>>;

    /// Reads the service principal itself.
    async fn service_principal(&self, resource_id: &str) -> AppResult<ServicePrincipal>;

    /// Looks a user up by principal name; `None` when the directory has no match.
    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<DirectoryUser>>;

    /// Lists a user's assignments across all resources.
    async fn list_user_assignments(&self, user_id: &str) -> AppResult<Vec<RoleAssignment>>;

    /// Creates one assignment.
    async fn create_assignment(&self, request: NewRoleAssignment) -> AppResult<RoleAssignment>;

    /// Deletes one assignment by its id.
    async fn delete_assignment(&self, resource_id: &str, assignment_id: &str) -> AppResult<()>;
}
