use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use rolegate_application::RoleChangeOutcome;
use rolegate_core::{AppError, UserIdentity};

use crate::dto::{
    AppRoleResponse, EnrichedAssignmentResponse, RoleChangeOutcomeResponse, RoleChangeRequest,
    UserRoleViewResponse, UserRolesRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AppRoleResponse>>> {
    let roles = state
        .role_service
        .list_app_roles()
        .await?
        .into_iter()
        .map(AppRoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn users_with_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EnrichedAssignmentResponse>>> {
    let assignments = state
        .role_service
        .roles_with_assignee_names()
        .await?
        .into_iter()
        .map(EnrichedAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn user_roles_handler(
    State(state): State<AppState>,
    payload: Result<Json<UserRolesRequest>, JsonRejection>,
) -> ApiResult<Json<UserRoleViewResponse>> {
    let email = request_body(payload)?.into_email()?;
    let view = state.role_service.roles_for_user(&email).await?;

    Ok(Json(UserRoleViewResponse::from(view)))
}

pub async fn assign_roles_handler(
    State(state): State<AppState>,
    actor: Option<Extension<UserIdentity>>,
    payload: Result<Json<RoleChangeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RoleChangeOutcomeResponse>)> {
    let (email, role_ids) = request_body(payload)?.into_parts()?;
    let outcome = state.role_service.assign_roles(&email, &role_ids).await?;
    log_outcome("assign", &email, actor.as_deref(), &outcome);

    Ok((
        StatusCode::CREATED,
        Json(RoleChangeOutcomeResponse::from(outcome)),
    ))
}

pub async fn remove_roles_handler(
    State(state): State<AppState>,
    actor: Option<Extension<UserIdentity>>,
    payload: Result<Json<RoleChangeRequest>, JsonRejection>,
) -> ApiResult<Json<RoleChangeOutcomeResponse>> {
    let (email, role_ids) = request_body(payload)?.into_parts()?;
    let outcome = state.role_service.remove_roles(&email, &role_ids).await?;
    log_outcome("remove", &email, actor.as_deref(), &outcome);

    Ok(Json(RoleChangeOutcomeResponse::from(outcome)))
}

/// A missing JSON body reads as an empty request so field validation reports it.
fn request_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

fn log_outcome(
    action: &str,
    email: &str,
    actor: Option<&UserIdentity>,
    outcome: &RoleChangeOutcome,
) {
    let actor = actor.map(UserIdentity::subject).unwrap_or("anonymous");

    for result in outcome.results.iter().filter(|result| !result.succeeded) {
        tracing::warn!(
            action,
            actor,
            email,
            role_id = %result.role_id,
            error = result.error.as_deref().unwrap_or_default(),
            "role change failed"
        );
    }

    tracing::info!(
        action,
        actor,
        email,
        succeeded = ?outcome.succeeded_ids(),
        "role change completed"
    );
}
