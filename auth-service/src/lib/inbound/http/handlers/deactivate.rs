use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

/// Deactivate the caller's account. Every session, this one included, is revoked.
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<()>, ApiError> {
    let (user, _) = context.require()?;

    state
        .auth_service
        .deactivate(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
