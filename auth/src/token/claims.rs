use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Which half of a token pair a token is.
///
/// Access tokens authenticate requests; refresh tokens are only accepted by
/// the rotation flow. Each operation checks the kind it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed payload of a single token.
///
/// Registered claims follow RFC 7519; `user_id`, `email`, `token_type` and
/// `session_id` are private claims binding the token to one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub token_type: TokenKind,
    pub session_id: Uuid,

    /// Issuer
    pub iss: String,

    /// Subject (user id as string)
    pub sub: String,

    /// Audience members
    pub aud: Vec<String>,

    /// Unique token identifier
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for one token of a pair.
    ///
    /// # Arguments
    /// * `kind` - Access or refresh
    /// * `user_id` - Owner of the token
    /// * `email` - Owner's email at issuance time
    /// * `session_id` - Session both tokens of the pair are bound to
    /// * `issuer` - Issuer string
    /// * `audience` - Single audience this token is minted for
    /// * `now` - Issuance instant
    /// * `ttl` - Validity window
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TokenKind,
        user_id: Uuid,
        email: impl Into<String>,
        session_id: Uuid,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let issued_at = now.timestamp();

        Self {
            user_id,
            email: email.into(),
            token_type: kind,
            session_id,
            iss: issuer.into(),
            sub: user_id.to_string(),
            aud: vec![audience.into()],
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn is_access(&self) -> bool {
        self.token_type == TokenKind::Access
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenKind::Refresh
    }

    /// Check if the token is expired at the given Unix timestamp.
    ///
    /// Matches the decoder with zero leeway: a token is still valid during
    /// its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
