use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionData;
use super::UserData;
use crate::inbound::http::middleware::AuthContext;

pub async fn me(
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    let (user, session) = context.require()?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user: user.into(),
            session: session.into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user: UserData,
    pub session: SessionData,
}
