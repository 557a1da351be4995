//! Role reconciliation over the directory API.
//!
//! Joins assignments with role definitions for display, and applies role
//! changes one assignment at a time. Changes are best effort: nothing is
//! rolled back, and every requested id is reported individually.

use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{AppRole, DirectoryUser, EmailAddress, RoleAssignment};

use crate::RoleDirectory;

mod changes;
mod queries;

/// Assignment joined with its role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedAssignment {
    /// Directory assignment record.
    pub assignment: RoleAssignment,
    /// Role display name or `Unknown Role`.
    pub role_name: String,
    /// Normalised creation timestamp.
    pub assignment_date: Option<String>,
}

/// One role currently assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRole {
    /// App role id.
    pub role_id: String,
    /// Assignment object id.
    pub assignment_id: String,
    /// Role display name or `Unknown Role`.
    pub display_name: String,
    /// Normalised creation timestamp.
    pub assignment_date: Option<String>,
}

/// A user's roles within the configured application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleView {
    /// User display name, falling back to the queried email.
    pub display_name: String,
    /// User principal name, falling back to the queried email.
    pub email: String,
    /// Display name of the service principal.
    pub application_display_name: String,
    /// Roles assigned on the configured resource.
    pub assigned_roles: Vec<AssignedRole>,
    /// The full role catalog, not filtered by assignment state.
    pub available_roles: Vec<AppRole>,
}

/// Per-id result of an assign or remove request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChangeResult {
    /// Requested app role id.
    pub role_id: String,
    /// Whether the directory accepted the change.
    pub succeeded: bool,
    /// Failure reason.
    pub error: Option<String>,
}

/// Summary returned by assign and remove operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChangeOutcome {
    /// Human-readable summary listing the ids that succeeded, or saying
    /// that none did.
    pub message: String,
    /// One entry per distinct requested id, in request order.
    pub results: Vec<RoleChangeResult>,
}

impl RoleChangeOutcome {
    fn from_results(verb: &str, results: Vec<RoleChangeResult>) -> Self {
        let succeeded: Vec<&str> = results
            .iter()
            .filter(|result| result.succeeded)
            .map(|result| result.role_id.as_str())
            .collect();

        let message = if succeeded.is_empty() {
            format!("No roles were {verb}.")
        } else {
            format!("Successfully {verb} roles: {}", succeeded.join(", "))
        };

        Self { message, results }
    }

    /// Returns the ids the directory accepted.
    #[must_use]
    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|result| result.succeeded)
            .map(|result| result.role_id.as_str())
            .collect()
    }
}

/// Application service reconciling users, assignments and role names.
#[derive(Clone)]
pub struct RoleReconciliationService {
    directory: Arc<dyn RoleDirectory>,
    resource_id: Option<String>,
}

impl RoleReconciliationService {
    /// Creates a service bound to one service principal.
    ///
    /// A missing `resource_id` is reported per request as a configuration error.
    #[must_use]
    pub fn new(directory: Arc<dyn RoleDirectory>, resource_id: Option<String>) -> Self {
        Self {
            directory,
            resource_id: resource_id.filter(|value| !value.trim().is_empty()),
        }
    }

    fn resource_id(&self) -> AppResult<&str> {
        self.resource_id.as_deref().ok_or_else(|| {
            AppError::Configuration("service principal id is not configured".to_owned())
        })
    }

    async fn resolve_user(&self, email: &str) -> AppResult<(EmailAddress, DirectoryUser)> {
        let email = EmailAddress::new(email)?;
        let user = self
            .directory
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", email.as_str())))?;

        Ok((email, user))
    }
}

/// Removes blank and repeated ids while keeping request order.
fn distinct_role_ids(role_ids: &[String]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(role_ids.len());
    for role_id in role_ids {
        let role_id = role_id.trim();
        if !role_id.is_empty() && !distinct.iter().any(|seen| seen.eq_ignore_ascii_case(role_id)) {
            distinct.push(role_id.to_owned());
        }
    }
    distinct
}

/// Per-item failure text; upstream detail stays in logs.
fn change_error_message(error: &AppError) -> String {
    match error {
        AppError::Upstream(_) | AppError::Internal(_) => "directory request failed".to_owned(),
        other => other.detail().to_owned(),
    }
}
