use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::IdError;
use crate::domain::user::models::UserId;

/// Session unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client details recorded with a session at login time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Server-side record of one login.
///
/// Deleting the row revokes every token bound to it, whatever their own
/// expiry says. A session past `expires_at` counts as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Build a session that expires `ttl` from now.
    ///
    /// The refresh token is empty until the pair bound to this session's id
    /// has been issued.
    pub fn new(id: SessionId, user_id: UserId, client: ClientMetadata, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            refresh_token: String::new(),
            user_agent: client.user_agent,
            ip_address: client.ip_address,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Replace the stored refresh token after a rotation.
    pub fn rotate(&mut self, refresh_token: String) {
        self.refresh_token = refresh_token;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expires_in_future() {
        let session = Session::new(
            SessionId::new(),
            UserId::new(),
            ClientMetadata::default(),
            Duration::days(30),
        );

        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(session.expires_at));
        assert!(session.refresh_token.is_empty());
    }

    #[test]
    fn test_rotate_moves_token_and_timestamp() {
        let mut session = Session::new(
            SessionId::new(),
            UserId::new(),
            ClientMetadata {
                user_agent: Some("curl/8.0".to_string()),
                ip_address: Some("10.0.0.1".to_string()),
            },
            Duration::days(30),
        );
        session.rotate("first".to_string());
        let before = session.updated_at;

        session.rotate("second".to_string());

        assert_eq!(session.refresh_token, "second");
        assert!(session.updated_at >= before);
        assert_eq!(session.user_agent.as_deref(), Some("curl/8.0"));
    }
}
