use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::rejection_message;
use super::handlers::ApiError;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;
use crate::domain::session::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity resolved for the current request.
///
/// Stored in request extensions by both gateway middlewares. Anonymous
/// requests under `optional_auth` carry an empty context.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub user_id: Option<UserId>,
}

impl AuthContext {
    pub fn authenticated(user: User, session: Session) -> Self {
        Self {
            user_id: Some(user.id),
            user: Some(user),
            session: Some(session),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.session.is_some()
    }

    /// Borrow the caller's identity.
    ///
    /// # Errors
    /// * `Unauthorized` - Request was not authenticated
    pub fn require(&self) -> Result<(&User, &Session), ApiError> {
        match (&self.user, &self.session) {
            (Some(user), Some(session)) => Ok((user, session)),
            _ => Err(ApiError::Unauthorized(
                rejection_message(AuthErrorKind::TokenNotFound).to_string(),
            )),
        }
    }
}

/// Middleware that rejects requests without a live access token.
///
/// On success the request continues with an authenticated `AuthContext`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // The request is not Sync; nothing borrowed from it may be held across an await.
    let token = extract_bearer_token(req.headers())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::debug!(uri = %req.uri(), "Missing bearer token");
            reject(AuthError::TokenNotFound)
        })?;
    let uri = req.uri().clone();

    let (user, session) = state
        .auth_service
        .validate(&token)
        .await
        .map_err(|e| {
            tracing::warn!(uri = %uri, error = %e, "Token validation failed");
            reject(e)
        })?;

    req.extensions_mut()
        .insert(AuthContext::authenticated(user, session));

    Ok(next.run(req).await)
}

/// Middleware that resolves the caller when it can and never rejects.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = extract_bearer_token(req.headers()).map(str::to_string);

    let context = match token {
        Some(token) => match state.auth_service.validate(&token).await {
            Ok((user, session)) => AuthContext::authenticated(user, session),
            Err(e) => {
                tracing::debug!(error = %e, "Continuing anonymously");
                AuthContext::anonymous()
            }
        },
        None => AuthContext::anonymous(),
    };

    req.extensions_mut().insert(context);

    next.run(req).await
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The value must split on a single space into exactly two parts, the
/// first being `Bearer` and the second non-empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

fn reject(err: AuthError) -> ApiError {
    match err.kind() {
        AuthErrorKind::Internal => ApiError::from(err),
        kind => ApiError::Unauthorized(rejection_message(kind).to_string()),
    }
}
