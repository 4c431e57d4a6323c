use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Authentication;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for authentication and session-lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and open its first session.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Authentication, AuthError>;

    /// Open a new session for existing credentials.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, inactive account or wrong
    ///   password; the three cases are indistinguishable
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<Authentication, AuthError>;

    /// Rotate the refresh token of a session and issue a new pair.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` - Token failed verification or is
    ///   not refresh-kind
    /// * `SessionNotFound` - No session holds this refresh token
    /// * `InvalidSession` - Session expired or bound to other claims
    /// * `UserNotFound` - Session owner no longer exists
    /// * `InvalidCredentials` - Session owner is deactivated
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Close one session. Closing an already closed session succeeds.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn logout(&self, session_id: &SessionId) -> Result<(), AuthError>;

    /// Close every session of a user.
    ///
    /// # Returns
    /// Number of sessions closed
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError>;

    /// Resolve an access token to its live user and session.
    ///
    /// # Errors
    /// * `InvalidToken` / `ExpiredToken` - Token failed verification or is
    ///   not access-kind
    /// * `SessionNotFound` - Session was revoked
    /// * `InvalidSession` - Session expired or owned by another user
    /// * `UserNotFound` - User no longer exists
    /// * `InvalidCredentials` - User is deactivated
    async fn validate(&self, access_token: &str) -> Result<(User, Session), AuthError>;

    /// Deactivate an account and revoke all of its sessions.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn deactivate(&self, user_id: &UserId) -> Result<(), AuthError>;

    /// Sweep sessions whose expiry has passed.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn cleanup_expired(&self) -> Result<u64, AuthError>;
}
