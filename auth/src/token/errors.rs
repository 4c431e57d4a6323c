use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` is kept apart from `Invalid` so callers can suggest a refresh
/// for expiry without doing so for tampered or foreign tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is bound to a different session")]
    SessionMismatch,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid token configuration: {0}")]
    InvalidConfiguration(String),
}
