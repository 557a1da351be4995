use crate::NewRoleAssignment;

use super::*;

impl RoleReconciliationService {
    /// Assigns each requested role to the user.
    ///
    /// Ids are processed in order with one directory call each. A failed id is
    /// reported in the outcome and does not stop the remaining ids, except for
    /// token failures which abort the request.
    pub async fn assign_roles(
        &self,
        email: &str,
        role_ids: &[String],
    ) -> AppResult<RoleChangeOutcome> {
        let resource_id = self.resource_id()?;
        let role_ids = distinct_role_ids(role_ids);
        if role_ids.is_empty() {
            return Err(AppError::Validation(
                "Email and role IDs are required.".to_owned(),
            ));
        }

        let (_, user) = self.resolve_user(email).await?;

        let mut results = Vec::with_capacity(role_ids.len());
        for role_id in role_ids {
            let request = NewRoleAssignment {
                principal_id: user.id().to_owned(),
                resource_id: resource_id.to_owned(),
                app_role_id: role_id.clone(),
            };

            let result = match self.directory.create_assignment(request).await {
                Ok(_) => RoleChangeResult {
                    role_id,
                    succeeded: true,
                    error: None,
                },
                Err(error @ AppError::Unauthorized(_)) => return Err(error),
                Err(error) => RoleChangeResult {
                    role_id,
                    succeeded: false,
                    error: Some(change_error_message(&error)),
                },
            };
            results.push(result);
        }

        Ok(RoleChangeOutcome::from_results("assigned", results))
    }

    /// Removes each requested role from the user.
    ///
    /// Only assignments on the configured resource are touched. Ids the user
    /// does not hold are reported as failed without calling the directory.
    pub async fn remove_roles(
        &self,
        email: &str,
        role_ids: &[String],
    ) -> AppResult<RoleChangeOutcome> {
        let resource_id = self.resource_id()?;
        let role_ids = distinct_role_ids(role_ids);
        if role_ids.is_empty() {
            return Err(AppError::Validation(
                "Email and role IDs are required.".to_owned(),
            ));
        }

        let (_, user) = self.resolve_user(email).await?;
        let assignments: Vec<RoleAssignment> = self
            .directory
            .list_user_assignments(user.id())
            .await?
            .into_iter()
            .filter(|assignment| assignment.belongs_to(resource_id))
            .filter(|assignment| role_ids.iter().any(|role_id| assignment.grants(role_id)))
            .collect();

        let mut results = Vec::with_capacity(role_ids.len());
        for role_id in role_ids {
            let matching: Vec<&RoleAssignment> = assignments
                .iter()
                .filter(|assignment| assignment.grants(&role_id))
                .collect();

            if matching.is_empty() {
                results.push(RoleChangeResult {
                    role_id,
                    succeeded: false,
                    error: Some("role is not assigned".to_owned()),
                });
                continue;
            }

            let mut failure = None;
            for assignment in matching {
                match self
                    .directory
                    .delete_assignment(resource_id, &assignment.id)
                    .await
                {
                    Ok(()) => {}
                    Err(error @ AppError::Unauthorized(_)) => return Err(error),
                    Err(error) => failure = Some(change_error_message(&error)),
                }
            }

            results.push(RoleChangeResult {
                role_id,
                succeeded: failure.is_none(),
                error: failure,
            });
        }

        Ok(RoleChangeOutcome::from_results("removed", results))
    }
}
