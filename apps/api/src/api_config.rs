use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rolegate_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_GRAPH_API_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
const DEFAULT_DIRECTORY_SCOPE: &str = "https://graph.microsoft.com/.default";
const DEFAULT_DOWNSTREAM_API_ENDPOINT: &str = "https://graph.microsoft.com/v1.0/me";
const DEFAULT_DIRECTORY_TIMEOUT_SECS: u64 = 30;

/// Routes the login callback must not shadow.
const RESERVED_PATHS: [&str; 10] = [
    "/",
    "/login",
    "/logout",
    "/call_downstream_api",
    "/health",
    "/roles",
    "/users_with_roles",
    "/user_roles",
    "/assign_roles",
    "/remove_roles",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreKind {
    Memory,
    Redis,
}

#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub client_id: String,
    pub client_secret: String,
    pub issuer_url: String,
    pub extra_scopes: Vec<String>,
    pub redirect_path: String,
    pub logout_url: Url,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub oidc: OidcConfig,
    pub public_base_url: Url,
    pub service_principal_id: Option<String>,
    pub graph_api_base_url: Url,
    pub directory_scope: String,
    pub directory_timeout: Duration,
    pub downstream_api_endpoint: Url,
    pub api_host: String,
    pub api_port: u16,
    pub session_store: SessionStoreKind,
    pub redis_url: Option<String>,
    pub cookie_secure: bool,
    pub role_api_require_login: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let authority = required(&lookup, "OIDC_AUTHORITY")?
            .trim_end_matches('/')
            .to_owned();
        let issuer_url = value("OIDC_ISSUER_URL").unwrap_or_else(|| format!("{authority}/v2.0"));
        let logout_url = parse_url(
            "OIDC_LOGOUT_URL",
            &value("OIDC_LOGOUT_URL")
                .unwrap_or_else(|| format!("{authority}/oauth2/v2.0/logout")),
        )?;

        let redirect_path = value("OIDC_REDIRECT_PATH").unwrap_or_else(|| "/auth_response".to_owned());
        if !redirect_path.starts_with('/') {
            return Err(AppError::Validation(format!(
                "OIDC_REDIRECT_PATH must start with '/', got '{redirect_path}'"
            )));
        }
        if RESERVED_PATHS.contains(&redirect_path.as_str()) {
            return Err(AppError::Validation(format!(
                "OIDC_REDIRECT_PATH '{redirect_path}' collides with an existing route"
            )));
        }

        let oidc = OidcConfig {
            client_id: required(&lookup, "OIDC_CLIENT_ID")?,
            client_secret: required(&lookup, "OIDC_CLIENT_SECRET")?,
            issuer_url,
            extra_scopes: value("OIDC_SCOPES")
                .map(|scopes| {
                    scopes
                        .split([' ', ','])
                        .map(str::trim)
                        .filter(|scope| !scope.is_empty())
                        .map(ToOwned::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            redirect_path,
            logout_url,
        };

        let api_host = value("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match value("API_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 5000,
        };

        let public_base_url = parse_url(
            "PUBLIC_BASE_URL",
            &value("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{api_port}")),
        )?;

        let directory_timeout = match value("DIRECTORY_TIMEOUT_SECS") {
            Some(seconds) => seconds.parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid DIRECTORY_TIMEOUT_SECS: {error}"))
            })?,
            None => DEFAULT_DIRECTORY_TIMEOUT_SECS,
        };

        let session_store = match value("SESSION_STORE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => SessionStoreKind::Memory,
            "redis" => SessionStoreKind::Redis,
            other => {
                return Err(AppError::Validation(format!(
                    "SESSION_STORE must be either 'memory' or 'redis', got '{other}'"
                )));
            }
        };
        let redis_url = value("REDIS_URL");
        if session_store == SessionStoreKind::Redis && redis_url.is_none() {
            return Err(AppError::Validation(
                "REDIS_URL is required when SESSION_STORE=redis".to_owned(),
            ));
        }

        Ok(Self {
            oidc,
            public_base_url,
            service_principal_id: value("SERVICE_PRINCIPAL_ID"),
            graph_api_base_url: parse_url(
                "GRAPH_API_BASE_URL",
                &value("GRAPH_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE_URL.to_owned()),
            )?,
            directory_scope: value("DIRECTORY_SCOPE")
                .unwrap_or_else(|| DEFAULT_DIRECTORY_SCOPE.to_owned()),
            directory_timeout: Duration::from_secs(directory_timeout),
            downstream_api_endpoint: parse_url(
                "DOWNSTREAM_API_ENDPOINT",
                &value("DOWNSTREAM_API_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_DOWNSTREAM_API_ENDPOINT.to_owned()),
            )?,
            api_host,
            api_port,
            session_store,
            redis_url,
            cookie_secure: flag(value("SESSION_COOKIE_SECURE"), false),
            role_api_require_login: flag(value("ROLE_API_REQUIRE_LOGIN"), true),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    /// Absolute URL the identity provider redirects back to.
    pub fn redirect_uri(&self) -> Result<String, AppError> {
        self.public_url(&self.oidc.redirect_path)
    }

    /// Absolute URL of the application root.
    pub fn home_url(&self) -> Result<String, AppError> {
        self.public_url("/")
    }

    fn public_url(&self, path: &str) -> Result<String, AppError> {
        self.public_base_url
            .join(path)
            .map(String::from)
            .map_err(|error| AppError::Internal(format!("invalid public url for '{path}': {error}")))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_url(name: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

fn flag(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |value| {
        matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
    })
}
