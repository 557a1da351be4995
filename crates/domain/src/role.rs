use std::collections::HashMap;

use rolegate_core::{AppError, AppResult, NonEmptyString};

/// Name used when an assignment references a role missing from the catalog.
pub const UNKNOWN_ROLE_NAME: &str = "Unknown Role";

/// Role definition exposed by a service principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRole {
    id: NonEmptyString,
    display_name: String,
    description: Option<String>,
    value: Option<String>,
    is_enabled: bool,
}

impl AppRole {
    /// Creates an enabled app role with a validated id.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            display_name: display_name.into(),
            description: None,
            value: None,
            is_enabled: true,
        })
    }

    /// Attaches the optional directory metadata.
    #[must_use]
    pub fn with_details(
        mut self,
        description: Option<String>,
        value: Option<String>,
        is_enabled: bool,
    ) -> Self {
        self.description = description;
        self.value = value;
        self.is_enabled = is_enabled;
        self
    }

    /// Returns the stable role id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the human-readable role name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the claim value emitted in tokens.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns whether the role can currently be assigned.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

/// The role catalog of one service principal with an id to name lookup.
///
/// The lookup is a function: one id never resolves to two names. Ids are
/// directory GUIDs, so lookups ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: Vec<AppRole>,
    names: HashMap<String, String>,
}

impl RoleCatalog {
    /// Builds a catalog, rejecting ids mapped to conflicting names.
    ///
    /// Exact duplicates are collapsed to their first occurrence.
    pub fn new(roles: Vec<AppRole>) -> AppResult<Self> {
        let mut names: HashMap<String, String> = HashMap::with_capacity(roles.len());
        let mut unique_roles = Vec::with_capacity(roles.len());

        for role in roles {
            let key = role.id().to_ascii_lowercase();
            match names.get(&key) {
                Some(existing) if existing != role.display_name() => {
                    return Err(AppError::Internal(format!(
                        "app role '{}' has conflicting names '{existing}' and '{}'",
                        role.id(),
                        role.display_name()
                    )));
                }
                Some(_) => {}
                None => {
                    names.insert(key, role.display_name().to_owned());
                    unique_roles.push(role);
                }
            }
        }

        Ok(Self {
            roles: unique_roles,
            names,
        })
    }

    /// Resolves a role id to its display name, or `Unknown Role`.
    #[must_use]
    pub fn role_name(&self, role_id: &str) -> &str {
        self.names
            .get(&role_id.to_ascii_lowercase())
            .map_or(UNKNOWN_ROLE_NAME, String::as_str)
    }

    /// Consumes the catalog, returning its roles.
    #[must_use]
    pub fn into_roles(self) -> Vec<AppRole> {
        self.roles
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn role(id: &str, name: &str) -> AppRole {
        AppRole::new(id, name).unwrap_or_else(|error| panic!("invalid test role: {error}"))
    }

    #[test]
    fn unresolved_ids_map_to_unknown_role() {
        let catalog = RoleCatalog::new(vec![role("R1", "Admin")]);
        let catalog = catalog.unwrap_or_else(|error| panic!("catalog rejected: {error}"));

        assert_eq!(catalog.role_name("R1"), "Admin");
        assert_eq!(catalog.role_name("R9"), UNKNOWN_ROLE_NAME);
    }

    #[test]
    fn conflicting_names_for_one_id_are_rejected() {
        let catalog = RoleCatalog::new(vec![role("R1", "Admin"), role("R1", "Viewer")]);
        assert!(catalog.is_err());
    }

    #[test]
    fn exact_duplicates_collapse() {
        let catalog = RoleCatalog::new(vec![role("R1", "Admin"), role("R1", "Admin")])
            .unwrap_or_else(|error| panic!("catalog rejected: {error}"));
        assert_eq!(catalog.into_roles().len(), 1);
    }

    #[test]
    fn lookup_ignores_id_case() {
        let catalog = RoleCatalog::new(vec![role("a1b2-C3", "Admin")])
            .unwrap_or_else(|error| panic!("catalog rejected: {error}"));

        assert_eq!(catalog.role_name("A1B2-c3"), "Admin");
    }

    #[test]
    fn ids_differing_only_in_case_are_one_role() {
        let catalog = RoleCatalog::new(vec![role("r1", "Admin"), role("R1", "Viewer")]);
        assert!(catalog.is_err());
    }

    #[test]
    fn empty_role_id_is_rejected() {
        assert!(AppRole::new(" ", "Admin").is_err());
    }

    proptest! {
        #[test]
        fn every_catalog_role_resolves_to_its_own_name(
            names in proptest::collection::vec("[A-Za-z]{1,12}", 0..16)
        ) {
            let roles: Vec<AppRole> = names
                .iter()
                .enumerate()
                .map(|(index, name)| role(&format!("role-{index}"), name))
                .collect();
            let catalog = RoleCatalog::new(roles.clone())
                .unwrap_or_else(|error| panic!("catalog rejected: {error}"));

            for role in &roles {
                prop_assert_eq!(catalog.role_name(role.id()), role.display_name());
            }
            prop_assert_eq!(catalog.into_roles(), roles);
        }
    }
}
