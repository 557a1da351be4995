use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use rolegate_application::UserAccessToken;
use rolegate_core::AppError;
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::html;
use crate::state::AppState;

use super::{SESSION_ACCESS_TOKEN_KEY, current_user};

pub async fn index_handler(session: Session) -> ApiResult<Response> {
    match current_user(&session).await? {
        Some(identity) => Ok(Html(html::index_page(&identity)).into_response()),
        None => Ok(Redirect::to("/login").into_response()),
    }
}

pub async fn call_downstream_api_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Response> {
    let token = session
        .get::<UserAccessToken>(SESSION_ACCESS_TOKEN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session token: {error}")))?
        .filter(|token| !token.is_expired_at(Utc::now().timestamp()));

    let Some(token) = token else {
        return Ok(Redirect::to("/login").into_response());
    };

    let response = state
        .downstream_client
        .get(state.downstream_api_endpoint.clone())
        .bearer_auth(&token.secret)
        .send()
        .await
        .map_err(|error| AppError::Upstream(format!("downstream request failed: {error}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!("{} {body}", status.as_u16())).into());
    }

    let result = response
        .json::<serde_json::Value>()
        .await
        .map_err(|error| AppError::Upstream(format!("invalid downstream response: {error}")))?;

    Ok(Html(html::display_page(&result)).into_response())
}
