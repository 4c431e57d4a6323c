use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthContext;
use crate::inbound::http::router::AppState;

pub async fn logout_all(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<LogoutAllResponseData>, ApiError> {
    let (user, _) = context.require()?;

    state
        .auth_service
        .logout_all(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|revoked_sessions| {
            ApiSuccess::new(StatusCode::OK, LogoutAllResponseData { revoked_sessions })
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutAllResponseData {
    pub revoked_sessions: u64,
}
