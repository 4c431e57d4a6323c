use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::client_metadata;
use super::ApiError;
use super::ApiSuccess;
use super::AuthenticationData;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthenticationData>, ApiError> {
    // A malformed email cannot belong to an account; answer like any other miss.
    let email = EmailAddress::new(body.email).map_err(|_| AuthError::InvalidCredentials)?;
    let command = LoginCommand::new(
        email,
        body.password,
        client_metadata(&headers, connect_info),
    );

    state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref authentication| ApiSuccess::new(StatusCode::OK, authentication.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
