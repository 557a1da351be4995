use httpmock::prelude::*;
use serde_json::json;

use super::*;

struct StaticTokens;

#[async_trait]
impl AccessTokenProvider for StaticTokens {
    async fn access_token(&self) -> AppResult<String> {
        Ok("test-token".to_owned())
    }
}

struct StalledTokens;

#[async_trait]
impl AccessTokenProvider for StalledTokens {
    async fn access_token(&self) -> AppResult<String> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("late-token".to_owned())
    }
}

struct RejectedTokens;

#[async_trait]
impl AccessTokenProvider for RejectedTokens {
    async fn access_token(&self) -> AppResult<String> {
        Err(AppError::Unauthorized("client credentials rejected".to_owned()))
    }
}

fn directory(server: &MockServer) -> GraphRoleDirectory {
    directory_with(server, Arc::new(StaticTokens))
}

fn directory_with(server: &MockServer, tokens: Arc<dyn AccessTokenProvider>) -> GraphRoleDirectory {
    directory_with_timeout(server, tokens, Duration::from_secs(5))
}

fn directory_with_timeout(
    server: &MockServer,
    tokens: Arc<dyn AccessTokenProvider>,
    timeout: Duration,
) -> GraphRoleDirectory {
    let base_url = Url::parse(&server.url("/v1.0/"))
        .unwrap_or_else(|error| panic!("mock server url should parse: {error}"));
    GraphRoleDirectory::new(base_url, tokens, timeout)
        .unwrap_or_else(|error| panic!("directory should build: {error}"))
}

fn new_assignment() -> NewRoleAssignment {
    NewRoleAssignment {
        principal_id: "u-1".to_owned(),
        resource_id: "sp-1".to_owned(),
        app_role_id: "R1".to_owned(),
    }
}

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).unwrap_or_else(|error| panic!("invalid email: {error}"))
}

#[tokio::test]
async fn list_app_roles_unwraps_collection() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/servicePrincipals/sp-1/appRoles")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "value": [
                    {"id": "R1", "displayName": "Admin", "value": "admin", "isEnabled": true},
                    {"id": "R2", "displayName": "Viewer", "isEnabled": false}
                ]
            }));
        })
        .await;

    let roles = directory(&server).list_app_roles("sp-1").await?;

    mock.assert_async().await;
    assert_eq!(roles.len(), 2);
    assert_eq!(roles[0].display_name(), "Admin");
    assert_eq!(roles[0].value(), Some("admin"));
    assert!(!roles[1].is_enabled());
    Ok(())
}

#[tokio::test]
async fn non_success_carries_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/servicePrincipals/sp-1/appRoles");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let result = directory(&server).list_app_roles("sp-1").await;

    match result {
        Err(AppError::Upstream(detail)) => assert_eq!(detail, "503 Service Unavailable"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn list_assignments_maps_graph_fields() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo");
            then.status(200).json_body(json!({
                "value": [{
                    "id": "as-1",
                    "appRoleId": "R1",
                    "principalId": "u-1",
                    "principalDisplayName": "Alex",
                    "principalType": "User",
                    "resourceId": "sp-1",
                    "resourceDisplayName": "Contoso Portal",
                    "createdDateTime": "2024-01-02T03:04:05.1234567Z"
                }]
            }));
        })
        .await;

    let assignments = directory(&server).list_assignments("sp-1").await?;

    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].app_role_id, "R1");
    assert_eq!(assignments[0].principal_display_name.as_deref(), Some("Alex"));
    assert_eq!(
        assignments[0].assignment_date().as_deref(),
        Some("2024-01-02 03:04:05")
    );
    Ok(())
}

#[tokio::test]
async fn missing_user_is_none() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/nobody@x.com");
            then.status(404)
                .json_body(json!({"error": {"code": "Request_ResourceNotFound"}}));
        })
        .await;

    let user = directory(&server)
        .find_user_by_email(&email("nobody@x.com"))
        .await?;

    assert!(user.is_none());
    Ok(())
}

#[tokio::test]
async fn user_body_without_id_is_none() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/ghost@x.com");
            then.status(200).json_body(json!({"displayName": "Ghost"}));
        })
        .await;

    let user = directory(&server)
        .find_user_by_email(&email("ghost@x.com"))
        .await?;

    assert!(user.is_none());
    Ok(())
}

#[tokio::test]
async fn user_lookup_returns_directory_user() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/a@x.com");
            then.status(200).json_body(json!({
                "id": "u-1",
                "displayName": "Alex",
                "userPrincipalName": "a@x.com"
            }));
        })
        .await;

    let user = directory(&server)
        .find_user_by_email(&email("a@x.com"))
        .await?
        .unwrap_or_else(|| panic!("user should resolve"));

    assert_eq!(user.id(), "u-1");
    assert_eq!(user.display_name(), Some("Alex"));
    Ok(())
}

#[tokio::test]
async fn service_principal_without_name_uses_fallback() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/servicePrincipals/sp-1");
            then.status(200).json_body(json!({"id": "sp-1"}));
        })
        .await;

    let principal = directory(&server).service_principal("sp-1").await?;

    assert_eq!(principal.display_name_or_default(), "Unknown Application");
    Ok(())
}

#[tokio::test]
async fn create_assignment_posts_camel_case_body() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo")
                .header("authorization", "Bearer test-token")
                .json_body(json!({
                    "principalId": "u-1",
                    "resourceId": "sp-1",
                    "appRoleId": "R1"
                }));
            then.status(201).json_body(json!({
                "id": "as-9",
                "appRoleId": "R1",
                "principalId": "u-1",
                "resourceId": "sp-1",
                "createdDateTime": "2024-06-01T12:00:00Z"
            }));
        })
        .await;

    let assignment = directory(&server)
        .create_assignment(NewRoleAssignment {
            principal_id: "u-1".to_owned(),
            resource_id: "sp-1".to_owned(),
            app_role_id: "R1".to_owned(),
        })
        .await?;

    mock.assert_async().await;
    assert_eq!(assignment.id, "as-9");
    Ok(())
}

#[tokio::test]
async fn delete_assignment_targets_assignment_path() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo/as-1");
            then.status(204);
        })
        .await;

    directory(&server).delete_assignment("sp-1", "as-1").await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn token_failure_is_unauthorized() {
    let server = MockServer::start_async().await;

    let result = directory_with(&server, Arc::new(RejectedTokens))
        .list_app_roles("sp-1")
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn create_requires_created_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo");
            then.status(200).json_body(json!({"id": "as-9"}));
        })
        .await;

    let result = directory(&server).create_assignment(new_assignment()).await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
}

#[tokio::test]
async fn created_status_with_short_body_is_success() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo");
            then.status(201).json_body(json!({"id": "as-9"}));
        })
        .await;

    let assignment = directory(&server).create_assignment(new_assignment()).await?;

    assert_eq!(assignment.id, "as-9");
    assert_eq!(assignment.app_role_id, "R1");
    assert_eq!(assignment.principal_id, "u-1");
    assert!(assignment.created_date_time.is_none());
    Ok(())
}

#[tokio::test]
async fn created_status_without_body_is_success() -> AppResult<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo");
            then.status(201);
        })
        .await;

    let assignment = directory(&server).create_assignment(new_assignment()).await?;

    assert_eq!(assignment.app_role_id, "R1");
    assert!(assignment.id.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_requires_no_content_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/v1.0/servicePrincipals/sp-1/appRoleAssignedTo/as-1");
            then.status(200);
        })
        .await;

    let result = directory(&server).delete_assignment("sp-1", "as-1").await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
}

#[tokio::test]
async fn stalled_token_acquisition_respects_timeout() {
    let server = MockServer::start_async().await;
    let directory =
        directory_with_timeout(&server, Arc::new(StalledTokens), Duration::from_millis(200));

    let started = std::time::Instant::now();
    let result = directory.list_app_roles("sp-1").await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(result, Err(AppError::Upstream(_))));
}
