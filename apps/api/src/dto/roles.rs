mod conversions;
mod types;

pub use types::{
    AppRoleResponse, AssignedRoleResponse, EnrichedAssignmentResponse, RoleChangeOutcomeResponse,
    RoleChangeRequest, RoleChangeResultResponse, UserRoleViewResponse, UserRolesRequest,
};
