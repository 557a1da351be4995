use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use rolegate_core::AppError;
use tower_sessions::Session;

use crate::auth::current_user;
use crate::error::ApiResult;

/// Rejects requests without a signed-in session and exposes the identity
/// to handlers as a request extension.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = current_user(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
