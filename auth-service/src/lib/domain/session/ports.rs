use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::UserId;

/// Persistence operations for sessions.
///
/// Implementations must tolerate concurrent deletes of the same row: the
/// expiry sweep and a lazy-expiry delete can race, and both must succeed.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, session: Session) -> Result<Session, AuthError>;

    /// Retrieve session by identifier.
    ///
    /// Expired rows are returned as stored; callers apply lazy expiry.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, AuthError>;

    /// Retrieve the session currently holding this exact refresh token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, AuthError>;

    /// Compare-and-replace update.
    ///
    /// Writes `session` only if the stored row still holds
    /// `expected_refresh_token`, so one refresh token can be rotated at most
    /// once.
    ///
    /// # Returns
    /// `true` if the row was written, `false` if it was missing or had
    /// already been rotated
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        session: Session,
        expected_refresh_token: &str,
    ) -> Result<bool, AuthError>;

    /// Remove a session. Removing a missing session is not an error.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &SessionId) -> Result<(), AuthError>;

    /// Remove every session owned by a user.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, AuthError>;

    /// Remove every session whose expiry has passed.
    ///
    /// # Returns
    /// Number of sessions removed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_expired(&self) -> Result<u64, AuthError>;
}
