//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_provider;
mod directory_ports;
mod role_reconciliation_service;

pub use auth_provider::{
    AuthProvider, CompletedLogin, LoginCallback, LoginRedirect, PendingLogin, UserAccessToken,
};
pub use directory_ports::{AccessTokenProvider, NewRoleAssignment, RoleDirectory};
pub use role_reconciliation_service::{
    AssignedRole, EnrichedAssignment, RoleChangeOutcome, RoleChangeResult,
    RoleReconciliationService, UserRoleView,
};
