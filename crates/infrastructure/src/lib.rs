//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod graph_role_directory;
mod oidc_auth_provider;
mod oidc_client_credentials_provider;
mod oidc_provider_client;

pub use graph_role_directory::GraphRoleDirectory;
pub use oidc_auth_provider::OidcAuthProvider;
pub use oidc_client_credentials_provider::OidcClientCredentialsProvider;
pub use oidc_provider_client::{OidcClientSettings, OidcProviderClient};
