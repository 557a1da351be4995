use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Payload for `POST /user_roles`.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../../../bindings/user-roles-request.ts")]
pub struct UserRolesRequest {
    pub email: Option<String>,
}

/// Payload for `POST /assign_roles` and `DELETE /remove_roles`.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../../../bindings/role-change-request.ts")]
pub struct RoleChangeRequest {
    pub email: Option<String>,
    pub role_ids: Option<Vec<String>>,
}

/// API representation of an app role definition.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../bindings/app-role-response.ts")]
pub struct AppRoleResponse {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub value: Option<String>,
    pub is_enabled: bool,
}

/// A role assignment with its resolved role name.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../bindings/enriched-assignment-response.ts")]
pub struct EnrichedAssignmentResponse {
    pub id: String,
    pub app_role_id: String,
    pub principal_id: String,
    pub principal_display_name: Option<String>,
    pub principal_type: Option<String>,
    pub resource_id: String,
    pub resource_display_name: Option<String>,
    pub created_date_time: Option<String>,
    pub role_name: String,
    pub assignment_date: Option<String>,
}

/// A role currently held by the queried user.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../bindings/assigned-role-response.ts")]
pub struct AssignedRoleResponse {
    pub id: String,
    pub assignment_id: String,
    pub display_name: String,
    pub assignment_date: Option<String>,
}

/// A user's roles within the managed application.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../bindings/user-role-view-response.ts")]
pub struct UserRoleViewResponse {
    pub display_name: String,
    pub email: String,
    pub application_display_name: String,
    pub assigned_roles: Vec<AssignedRoleResponse>,
    pub available_roles: Vec<AppRoleResponse>,
}

/// Result for one requested role id.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/role-change-result-response.ts")]
pub struct RoleChangeResultResponse {
    pub id: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

/// Summary of an assign or remove request.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/role-change-outcome-response.ts")]
pub struct RoleChangeOutcomeResponse {
    pub message: String,
    pub results: Vec<RoleChangeResultResponse>,
}
