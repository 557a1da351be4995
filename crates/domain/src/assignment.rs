use chrono::{DateTime, Utc};

/// A directory record linking a principal to an app role within a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Assignment object id; the handle used for deletion.
    pub id: String,
    /// Assigned app role id.
    pub app_role_id: String,
    /// Assigned principal (user) id.
    pub principal_id: String,
    /// Principal display name as reported by the directory.
    pub principal_display_name: Option<String>,
    /// Principal type such as `User` or `Group`.
    pub principal_type: Option<String>,
    /// Service principal the role belongs to.
    pub resource_id: String,
    /// Resource display name as reported by the directory.
    pub resource_display_name: Option<String>,
    /// Raw RFC 3339 creation timestamp.
    pub created_date_time: Option<String>,
}

impl RoleAssignment {
    /// Returns whether the assignment targets the given resource.
    ///
    /// Directory object ids are GUIDs and compare case-insensitively.
    #[must_use]
    pub fn belongs_to(&self, resource_id: &str) -> bool {
        self.resource_id.eq_ignore_ascii_case(resource_id)
    }

    /// Returns whether the assignment grants the given app role.
    #[must_use]
    pub fn grants(&self, role_id: &str) -> bool {
        self.app_role_id.eq_ignore_ascii_case(role_id)
    }

    /// Returns the creation timestamp in display form.
    #[must_use]
    pub fn assignment_date(&self) -> Option<String> {
        self.created_date_time
            .as_deref()
            .map(normalize_assignment_timestamp)
    }
}

/// Renders an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Values that do not parse are returned unchanged.
#[must_use]
fn normalize_assignment_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim()).map_or_else(
        |_| raw.to_owned(),
        |timestamp| {
            timestamp
                .with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(resource_id: &str) -> RoleAssignment {
        RoleAssignment {
            id: "a-1".to_owned(),
            app_role_id: "R1".to_owned(),
            principal_id: "u-1".to_owned(),
            principal_display_name: None,
            principal_type: Some("User".to_owned()),
            resource_id: resource_id.to_owned(),
            resource_display_name: None,
            created_date_time: Some("2024-03-05T07:08:09Z".to_owned()),
        }
    }

    #[test]
    fn zulu_timestamp_is_reformatted() {
        assert_eq!(
            normalize_assignment_timestamp("2024-03-05T07:08:09Z"),
            "2024-03-05 07:08:09"
        );
    }

    #[test]
    fn fractional_seconds_are_dropped_not_truncated_into() {
        assert_eq!(
            normalize_assignment_timestamp("2021-02-15T10:31:53.5856427Z"),
            "2021-02-15 10:31:53"
        );
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        assert_eq!(
            normalize_assignment_timestamp("2024-03-05T09:08:09+02:00"),
            "2024-03-05 07:08:09"
        );
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        assert_eq!(normalize_assignment_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn resource_match_ignores_guid_case() {
        let record = assignment("ABCDEF00-0000-0000-0000-000000000001");
        assert!(record.belongs_to("abcdef00-0000-0000-0000-000000000001"));
        assert!(!record.belongs_to("other"));
        assert_eq!(record.assignment_date().as_deref(), Some("2024-03-05 07:08:09"));
    }

    #[test]
    fn role_match_ignores_guid_case() {
        let record = assignment("sp-1");
        assert!(record.grants("r1"));
        assert!(!record.grants("R2"));
    }
}
