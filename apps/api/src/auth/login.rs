use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use rolegate_application::{LoginCallback, PendingLogin};
use rolegate_core::AppError;
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::html;
use crate::state::AppState;

use super::{SESSION_ACCESS_TOKEN_KEY, SESSION_PENDING_LOGIN_KEY, SESSION_USER_KEY};

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Redirect> {
    let redirect = state.auth_provider.begin_login(&state.redirect_uri)?;

    session
        .insert(SESSION_PENDING_LOGIN_KEY, &redirect.pending)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store login state: {error}")))?;

    Ok(Redirect::to(&redirect.authorization_url))
}

pub async fn auth_response_handler(
    State(state): State<AppState>,
    session: Session,
    Query(callback): Query<LoginCallback>,
) -> ApiResult<Response> {
    let pending = session
        .remove::<PendingLogin>(SESSION_PENDING_LOGIN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read login state: {error}")))?;

    let Some(pending) = pending else {
        tracing::warn!("login callback without a pending login");
        return Ok(Html(html::auth_error_page(
            "The login session expired or was never started.",
        ))
        .into_response());
    };

    let completed = match state.auth_provider.complete_login(pending, callback).await {
        Ok(completed) => completed,
        Err(AppError::Unauthorized(detail)) => {
            tracing::warn!(detail = %detail, "login callback rejected");
            return Ok(Html(html::auth_error_page(&detail)).into_response());
        }
        Err(error) => return Err(error.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, &completed.identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;
    session
        .insert(SESSION_ACCESS_TOKEN_KEY, &completed.access_token)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;

    Ok(Redirect::to("/").into_response())
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Redirect> {
    if let Some(identity) = super::current_user(&session).await? {
        tracing::info!(subject = identity.subject(), "user signed out");
    }

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    let logout_url = state.auth_provider.logout_url(&state.home_url)?;
    Ok(Redirect::to(&logout_url))
}
