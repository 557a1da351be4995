use super::*;

impl GraphRoleDirectory {
    pub(super) async fn create_assignment_impl(
        &self,
        request: NewRoleAssignment,
    ) -> AppResult<RoleAssignment> {
        let url = self.endpoint(&[
            "servicePrincipals",
            request.resource_id.as_str(),
            "appRoleAssignedTo",
        ])?;
        let body = CreateAssignmentBody {
            principal_id: request.principal_id.as_str(),
            resource_id: request.resource_id.as_str(),
            app_role_id: request.app_role_id.as_str(),
        };

        let response = self.send(self.http_client.post(url).json(&body)).await?;
        let response = expect_status(response, StatusCode::CREATED).await?;

        let row = response
            .json::<CreatedAssignmentRow>()
            .await
            .unwrap_or_else(|error| {
                tracing::debug!(
                    role_id = %request.app_role_id,
                    error = %error,
                    "created assignment body could not be read"
                );
                CreatedAssignmentRow::default()
            });

        Ok(RoleAssignment {
            id: row.id.unwrap_or_default(),
            app_role_id: request.app_role_id,
            principal_id: request.principal_id,
            principal_display_name: row.principal_display_name,
            principal_type: row.principal_type,
            resource_id: request.resource_id,
            resource_display_name: row.resource_display_name,
            created_date_time: row.created_date_time,
        })
    }

    pub(super) async fn delete_assignment_impl(
        &self,
        resource_id: &str,
        assignment_id: &str,
    ) -> AppResult<()> {
        let url = self.endpoint(&[
            "servicePrincipals",
            resource_id,
            "appRoleAssignedTo",
            assignment_id,
        ])?;

        let response = self.send(self.http_client.delete(url)).await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}
