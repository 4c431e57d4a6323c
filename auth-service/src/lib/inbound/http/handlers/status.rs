use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::AuthContext;

/// Report whether the caller is signed in. Never fails.
pub async fn status(Extension(context): Extension<AuthContext>) -> ApiSuccess<StatusResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        StatusResponseData {
            authenticated: context.is_authenticated(),
            user: context.user.as_ref().map(UserData::from),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponseData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserData>,
}
