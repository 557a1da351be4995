//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod role;
mod user;

pub use assignment::RoleAssignment;
pub use role::{AppRole, RoleCatalog, UNKNOWN_ROLE_NAME};
pub use user::{DirectoryUser, EmailAddress, ServicePrincipal, UNKNOWN_APPLICATION_NAME};
