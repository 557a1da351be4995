use rolegate_domain::{AppRole, RoleCatalog};

use super::*;

impl RoleReconciliationService {
    /// Returns the role catalog of the configured application.
    ///
    /// Upstream failures keep their status and body text in the error.
    pub async fn list_app_roles(&self) -> AppResult<Vec<AppRole>> {
        let resource_id = self.resource_id()?;
        let roles = self
            .directory
            .list_app_roles(resource_id)
            .await
            .map_err(|error| match error {
                AppError::Upstream(detail) => {
                    AppError::Internal(format!("failed to fetch roles: {detail}"))
                }
                other => other,
            })?;

        Ok(RoleCatalog::new(roles)?.into_roles())
    }

    /// Lists every assignment on the application with its role name.
    pub async fn roles_with_assignee_names(&self) -> AppResult<Vec<EnrichedAssignment>> {
        let resource_id = self.resource_id()?;
        let catalog = RoleCatalog::new(self.directory.list_app_roles(resource_id).await?)?;
        let assignments = self.directory.list_assignments(resource_id).await?;

        Ok(assignments
            .into_iter()
            .filter(|assignment| assignment.belongs_to(resource_id))
            .map(|assignment| EnrichedAssignment {
                role_name: catalog.role_name(&assignment.app_role_id).to_owned(),
                assignment_date: assignment.assignment_date(),
                assignment,
            })
            .collect())
    }

    /// Returns a user's assigned roles alongside the full catalog.
    pub async fn roles_for_user(&self, email: &str) -> AppResult<UserRoleView> {
        let resource_id = self.resource_id()?;
        let (email, user) = self.resolve_user(email).await?;

        let catalog = RoleCatalog::new(self.directory.list_app_roles(resource_id).await?)?;
        let principal = self.directory.service_principal(resource_id).await?;
        let assignments = self.directory.list_user_assignments(user.id()).await?;

        let assigned_roles = assignments
            .into_iter()
            .filter(|assignment| assignment.belongs_to(resource_id))
            .map(|assignment| AssignedRole {
                display_name: catalog.role_name(&assignment.app_role_id).to_owned(),
                assignment_date: assignment.assignment_date(),
                role_id: assignment.app_role_id,
                assignment_id: assignment.id,
            })
            .collect();

        Ok(UserRoleView {
            display_name: user
                .display_name()
                .unwrap_or(email.as_str())
                .to_owned(),
            email: user
                .user_principal_name()
                .unwrap_or(email.as_str())
                .to_owned(),
            application_display_name: principal.display_name_or_default().to_owned(),
            assigned_roles,
            available_roles: catalog.into_roles(),
        })
    }
}
