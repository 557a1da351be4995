use rolegate_application::{
    AssignedRole, EnrichedAssignment, RoleChangeOutcome, RoleChangeResult, UserRoleView,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::AppRole;

use super::types::{
    AppRoleResponse, AssignedRoleResponse, EnrichedAssignmentResponse, RoleChangeOutcomeResponse,
    RoleChangeRequest, RoleChangeResultResponse, UserRoleViewResponse, UserRolesRequest,
};

const EMAIL_REQUIRED: &str = "Email parameter is required.";
const EMAIL_AND_ROLES_REQUIRED: &str = "Email and role IDs are required.";

impl UserRolesRequest {
    /// Returns the requested email or the validation error clients expect.
    pub fn into_email(self) -> AppResult<String> {
        self.email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| AppError::Validation(EMAIL_REQUIRED.to_owned()))
    }
}

impl RoleChangeRequest {
    /// Splits the payload into email and role ids, both required and non-empty.
    pub fn into_parts(self) -> AppResult<(String, Vec<String>)> {
        let email = self.email.filter(|email| !email.trim().is_empty());
        let role_ids = self.role_ids.filter(|role_ids| !role_ids.is_empty());

        match (email, role_ids) {
            (Some(email), Some(role_ids)) => Ok((email, role_ids)),
            _ => Err(AppError::Validation(EMAIL_AND_ROLES_REQUIRED.to_owned())),
        }
    }
}

impl From<AppRole> for AppRoleResponse {
    fn from(role: AppRole) -> Self {
        Self {
            id: role.id().to_owned(),
            display_name: role.display_name().to_owned(),
            description: role.description().map(ToOwned::to_owned),
            value: role.value().map(ToOwned::to_owned),
            is_enabled: role.is_enabled(),
        }
    }
}

impl From<EnrichedAssignment> for EnrichedAssignmentResponse {
    fn from(enriched: EnrichedAssignment) -> Self {
        let assignment = enriched.assignment;
        Self {
            id: assignment.id,
            app_role_id: assignment.app_role_id,
            principal_id: assignment.principal_id,
            principal_display_name: assignment.principal_display_name,
            principal_type: assignment.principal_type,
            resource_id: assignment.resource_id,
            resource_display_name: assignment.resource_display_name,
            created_date_time: assignment.created_date_time,
            role_name: enriched.role_name,
            assignment_date: enriched.assignment_date,
        }
    }
}

impl From<AssignedRole> for AssignedRoleResponse {
    fn from(role: AssignedRole) -> Self {
        Self {
            id: role.role_id,
            assignment_id: role.assignment_id,
            display_name: role.display_name,
            assignment_date: role.assignment_date,
        }
    }
}

impl From<UserRoleView> for UserRoleViewResponse {
    fn from(view: UserRoleView) -> Self {
        Self {
            display_name: view.display_name,
            email: view.email,
            application_display_name: view.application_display_name,
            assigned_roles: view.assigned_roles.into_iter().map(Into::into).collect(),
            available_roles: view.available_roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RoleChangeResult> for RoleChangeResultResponse {
    fn from(result: RoleChangeResult) -> Self {
        Self {
            id: result.role_id,
            succeeded: result.succeeded,
            error: result.error,
        }
    }
}

impl From<RoleChangeOutcome> for RoleChangeOutcomeResponse {
    fn from(outcome: RoleChangeOutcome) -> Self {
        Self {
            message: outcome.message,
            results: outcome.results.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rolegate_core::AppError;

    use super::{EMAIL_AND_ROLES_REQUIRED, EMAIL_REQUIRED};
    use crate::dto::{RoleChangeRequest, UserRolesRequest};

    #[test]
    fn blank_email_uses_lookup_message() {
        let result = UserRolesRequest {
            email: Some("  ".to_owned()),
        }
        .into_email();

        assert!(matches!(result, Err(AppError::Validation(message)) if message == EMAIL_REQUIRED));
    }

    #[test]
    fn empty_role_ids_use_change_message() {
        let result = RoleChangeRequest {
            email: Some("a@x.com".to_owned()),
            role_ids: Some(Vec::new()),
        }
        .into_parts();

        assert!(
            matches!(result, Err(AppError::Validation(message)) if message == EMAIL_AND_ROLES_REQUIRED)
        );
    }

    #[test]
    fn complete_change_request_splits() {
        let parts = RoleChangeRequest {
            email: Some("a@x.com".to_owned()),
            role_ids: Some(vec!["R1".to_owned()]),
        }
        .into_parts()
        .ok();

        assert_eq!(parts, Some(("a@x.com".to_owned(), vec!["R1".to_owned()])));
    }
}
