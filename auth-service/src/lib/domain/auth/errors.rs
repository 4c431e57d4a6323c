use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for identifier parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Coarse classification of an `AuthError`.
///
/// Callers branch on this instead of on variant payloads, so the set of
/// outcomes a transport has to handle stays closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredentials,
    AlreadyExists,
    UserNotFound,
    SessionNotFound,
    InvalidSession,
    InvalidToken,
    ExpiredToken,
    TokenNotFound,
    Internal,
}

/// Top-level error for every authentication and session operation
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session is invalid or expired")]
    InvalidSession,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("No token provided")]
    TokenNotFound,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::AlreadyExists(_) => AuthErrorKind::AlreadyExists,
            AuthError::UserNotFound => AuthErrorKind::UserNotFound,
            AuthError::SessionNotFound => AuthErrorKind::SessionNotFound,
            AuthError::InvalidSession => AuthErrorKind::InvalidSession,
            AuthError::InvalidToken(_) => AuthErrorKind::InvalidToken,
            AuthError::ExpiredToken => AuthErrorKind::ExpiredToken,
            AuthError::TokenNotFound => AuthErrorKind::TokenNotFound,
            AuthError::Password(_)
            | AuthError::TokenIssuance(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => AuthErrorKind::Internal,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Invalid(reason) => AuthError::InvalidToken(reason),
            TokenError::SessionMismatch => AuthError::InvalidSession,
            TokenError::EncodingFailed(_) | TokenError::InvalidConfiguration(_) => {
                AuthError::TokenIssuance(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_keep_expiry_distinct() {
        assert_eq!(
            AuthError::from(TokenError::Expired).kind(),
            AuthErrorKind::ExpiredToken
        );
        assert_eq!(
            AuthError::from(TokenError::Invalid("bad signature".to_string())).kind(),
            AuthErrorKind::InvalidToken
        );
        assert_eq!(
            AuthError::from(TokenError::SessionMismatch).kind(),
            AuthErrorKind::InvalidSession
        );
        assert_eq!(
            AuthError::from(TokenError::EncodingFailed("boom".to_string())).kind(),
            AuthErrorKind::Internal
        );
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        assert_eq!(
            AuthError::DatabaseError("connection reset".to_string()).kind(),
            AuthErrorKind::Internal
        );
        assert_eq!(
            AuthError::from(PasswordError::HashingFailed("oom".to_string())).kind(),
            AuthErrorKind::Internal
        );
    }
}
