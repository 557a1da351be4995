use super::*;

impl GraphRoleDirectory {
    pub(super) async fn list_app_roles_impl(&self, resource_id: &str) -> AppResult<Vec<AppRole>> {
        let url = self.endpoint(&["servicePrincipals", resource_id, "appRoles"])?;
        let collection: GraphCollection<AppRoleRow> = self.get_json(url).await?;

        collection.value.into_iter().map(AppRole::try_from).collect()
    }

    pub(super) async fn list_assignments_impl(
        &self,
        resource_id: &str,
    ) -> AppResult<Vec<RoleAssignment>> {
        let url = self.endpoint(&["servicePrincipals", resource_id, "appRoleAssignedTo"])?;
        let collection: GraphCollection<AssignmentRow> = self.get_json(url).await?;

        Ok(collection
            .value
            .into_iter()
            .map(RoleAssignment::from)
            .collect())
    }

    pub(super) async fn service_principal_impl(
        &self,
        resource_id: &str,
    ) -> AppResult<ServicePrincipal> {
        let url = self.endpoint(&["servicePrincipals", resource_id])?;
        let row: ServicePrincipalRow = self.get_json(url).await?;

        Ok(ServicePrincipal {
            id: row.id,
            display_name: row.display_name,
        })
    }

    pub(super) async fn find_user_by_email_impl(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<DirectoryUser>> {
        let url = self.endpoint(&["users", email.as_str()])?;
        let response = self.send(self.http_client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(email = email.as_str(), "directory user not found");
            return Ok(None);
        }

        let row: UserRow = decode(ensure_success(response).await?).await?;
        let Some(id) = row.id.filter(|id| !id.trim().is_empty()) else {
            return Ok(None);
        };

        DirectoryUser::new(id, row.display_name, row.user_principal_name).map(Some)
    }

    pub(super) async fn list_user_assignments_impl(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<RoleAssignment>> {
        let url = self.endpoint(&["users", user_id, "appRoleAssignments"])?;
        let collection: GraphCollection<AssignmentRow> = self.get_json(url).await?;

        Ok(collection
            .value
            .into_iter()
            .map(RoleAssignment::from)
            .collect())
    }
}
