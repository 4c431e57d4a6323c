use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

/// Close the session the request was authenticated with.
pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<()>, ApiError> {
    let (_, session) = context.require()?;

    state
        .auth_service
        .logout(&session.id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
