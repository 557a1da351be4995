mod common;
mod roles;

pub use common::HealthResponse;
pub use roles::{
    AppRoleResponse, AssignedRoleResponse, EnrichedAssignmentResponse, RoleChangeOutcomeResponse,
    RoleChangeRequest, RoleChangeResultResponse, UserRoleViewResponse, UserRolesRequest,
};
