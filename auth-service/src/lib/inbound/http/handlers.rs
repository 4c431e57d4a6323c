use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;
use crate::domain::auth::models::Authentication;
use crate::domain::session::models::ClientMetadata;
use crate::domain::session::models::Session;
use crate::domain::user::models::User;

pub mod deactivate;
pub mod login;
pub mod logout;
pub mod logout_all;
pub mod me;
pub mod refresh;
pub mod register;
pub mod status;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "Unhandled error");
        Self::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// User-facing message for an authentication failure.
///
/// Store and token internals never reach the client; only the kind does.
pub fn rejection_message(kind: AuthErrorKind) -> &'static str {
    match kind {
        AuthErrorKind::ExpiredToken => "token has expired",
        AuthErrorKind::SessionNotFound => "token not found",
        AuthErrorKind::InvalidSession => "session is invalid or expired",
        AuthErrorKind::UserNotFound => "user not found",
        AuthErrorKind::TokenNotFound => "authorization token is required",
        _ => "invalid token",
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.kind() {
            AuthErrorKind::Internal => {
                tracing::error!(error = %err, "Auth operation failed");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
            AuthErrorKind::AlreadyExists => ApiError::Conflict(err.to_string()),
            AuthErrorKind::InvalidCredentials => {
                ApiError::Unauthorized("invalid credentials".to_string())
            }
            kind => ApiError::Unauthorized(rejection_message(kind).to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Body returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationData {
    pub user: UserData,
    pub tokens: TokenPair,
}

impl From<&Authentication> for AuthenticationData {
    fn from(authentication: &Authentication) -> Self {
        Self {
            user: (&authentication.user).into(),
            tokens: authentication.tokens.clone(),
        }
    }
}

/// Public view of a session. The stored refresh token is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub id: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionData {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.to_string(),
            user_agent: session.user_agent.clone(),
            ip_address: session.ip_address.clone(),
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}

/// Collect the client details recorded on a new session.
///
/// The address comes from the first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer.
pub fn client_metadata(
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> ClientMetadata {
    let user_agent = header_value(headers, "user-agent");

    let ip_address = header_value(headers, "x-forwarded-for")
        .and_then(|forwarded| {
            forwarded
                .split(',')
                .map(str::trim)
                .find(|entry| !entry.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
        .or_else(|| connect_info.map(|ConnectInfo(address)| address.ip().to_string()));

    ClientMetadata {
        user_agent,
        ip_address,
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
