//! Directory principal types and email validation.

use rolegate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Fallback shown when the service principal has no display name.
pub const UNKNOWN_APPLICATION_NAME: &str = "Unknown Application";

/// Validated email address used as a directory lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// A user resolved from the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    id: NonEmptyString,
    display_name: Option<String>,
    user_principal_name: Option<String>,
}

impl DirectoryUser {
    /// Creates a directory user; the object id must be non-empty.
    pub fn new(
        id: impl Into<String>,
        display_name: Option<String>,
        user_principal_name: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            display_name,
            user_principal_name,
        })
    }

    /// Returns the directory object id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name, if the directory has one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the user principal name, if the directory has one.
    #[must_use]
    pub fn user_principal_name(&self) -> Option<&str> {
        self.user_principal_name.as_deref()
    }
}

/// The registered application whose roles are managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    /// Directory object id.
    pub id: String,
    /// Application display name.
    pub display_name: Option<String>,
}

impl ServicePrincipal {
    /// Returns the display name or the `Unknown Application` fallback.
    #[must_use]
    pub fn display_name_or_default(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_APPLICATION_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_normalized() {
        let email = EmailAddress::new("  A@X.com ");
        assert_eq!(
            email.map(String::from).ok().as_deref(),
            Some("a@x.com")
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@x.com").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn directory_user_requires_id() {
        assert!(DirectoryUser::new("", None, None).is_err());
        assert!(DirectoryUser::new("u-1", None, Some("a@x.com".to_owned())).is_ok());
    }

    #[test]
    fn service_principal_falls_back_to_unknown_application() {
        let principal = ServicePrincipal {
            id: "sp-1".to_owned(),
            display_name: None,
        };
        assert_eq!(principal.display_name_or_default(), UNKNOWN_APPLICATION_NAME);
    }
}
