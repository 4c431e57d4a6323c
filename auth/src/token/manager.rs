use std::fmt;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::TokenError;

/// Immutable signing configuration, built once at process start.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Access and refresh token issued together for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,

    /// Access token expiry (Unix timestamp)
    pub expires_at: i64,
}

/// Stateless issuer and verifier of signed token pairs.
///
/// Holds only key material, issuer, audience and the two TTLs. Uses HS256.
/// Nothing here touches storage: revocation is the session store's job.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a token manager from its configuration.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Empty secret, or access TTL not strictly
    ///   shorter than refresh TTL
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::InvalidConfiguration(
                "signing secret must not be empty".to_string(),
            ));
        }

        if config.access_ttl >= config.refresh_ttl {
            return Err(TokenError::InvalidConfiguration(format!(
                "access ttl ({}s) must be shorter than refresh ttl ({}s)",
                config.access_ttl.num_seconds(),
                config.refresh_ttl.num_seconds()
            )));
        }

        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            audience: config.audience,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue a fresh access/refresh pair bound to one session.
    ///
    /// # Arguments
    /// * `user_id` - Token owner
    /// * `email` - Owner's email, embedded in both tokens
    /// * `session_id` - Session both tokens are bound to
    ///
    /// # Returns
    /// Signed pair plus the access token's expiry
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        session_id: Uuid,
    ) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        let access = self.claims(TokenKind::Access, user_id, email, session_id, now);
        let refresh = self.claims(TokenKind::Refresh, user_id, email, session_id, now);

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            expires_at: access.exp,
        })
    }

    fn claims(
        &self,
        kind: TokenKind,
        user_id: Uuid,
        email: &str,
        session_id: Uuid,
        now: chrono::DateTime<Utc>,
    ) -> Claims {
        Claims::new(
            kind,
            user_id,
            email,
            session_id,
            self.issuer.as_str(),
            self.audience.as_str(),
            now,
            self.ttl(kind),
        )
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Check signature and validity window, then return the claims.
    ///
    /// # Errors
    /// * `Expired` - Signature is valid but `exp` has passed
    /// * `Invalid` - Malformed, bad signature, not yet valid, or wrong
    ///   issuer/audience
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    /// Exchange a refresh token for a new pair on the same session.
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh-kind token previously issued
    /// * `expected_session_id` - Session the caller believes the token belongs to
    ///
    /// # Errors
    /// * `Invalid` / `Expired` - From `verify`, or token is not refresh-kind
    /// * `SessionMismatch` - Token is bound to another session
    /// * `EncodingFailed` - Signing failed
    pub fn refresh_pair(
        &self,
        refresh_token: &str,
        expected_session_id: Uuid,
    ) -> Result<TokenPair, TokenError> {
        let claims = self.verify(refresh_token)?;

        if !claims.is_refresh() {
            return Err(TokenError::Invalid(format!(
                "expected refresh token, got {}",
                claims.token_type
            )));
        }

        if claims.session_id != expected_session_id {
            return Err(TokenError::SessionMismatch);
        }

        self.issue_pair(claims.user_id, &claims.email, claims.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "s3cret".to_string(),
            issuer: "app".to_string(),
            audience: "app-users".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(720),
        }
    }

    fn manager() -> TokenManager {
        TokenManager::new(config()).expect("valid config")
    }

    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        bytes[0] = if bytes[0] == b'A' { b'B' } else { b'A' };
        format!("{}.{}", head, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_issue_pair_binds_both_tokens_to_session() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let pair = manager.issue_pair(user_id, "a@b.com", session_id).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = manager.verify(&pair.access_token).unwrap();
        let refresh = manager.verify(&pair.refresh_token).unwrap();

        assert_eq!(access.token_type, TokenKind::Access);
        assert_eq!(refresh.token_type, TokenKind::Refresh);
        assert_eq!(access.session_id, session_id);
        assert_eq!(refresh.session_id, session_id);
        assert_eq!(access.user_id, user_id);
        assert_eq!(access.email, "a@b.com");
        assert_eq!(access.iss, "app");
        assert_eq!(pair.expires_at, access.exp);
        assert_ne!(access.jti, refresh.jti);
        assert!(access.exp < refresh.exp);
    }

    #[test]
    fn test_new_rejects_access_ttl_not_shorter_than_refresh() {
        let mut config = config();
        config.access_ttl = Duration::hours(720);

        let result = TokenManager::new(config);
        assert!(matches!(result, Err(TokenError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        let mut config = config();
        config.secret = String::new();

        let result = TokenManager::new(config);
        assert!(matches!(result, Err(TokenError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_verify_tampered_signature_is_invalid() {
        let manager = manager();
        let pair = manager
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        let result = manager.verify(&tamper_signature(&pair.access_token));
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let mut config = config();
        config.access_ttl = Duration::minutes(-5);
        let manager = TokenManager::new(config).unwrap();

        let pair = manager
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        assert_eq!(manager.verify(&pair.access_token), Err(TokenError::Expired));
        // The refresh half is still within its window.
        assert!(manager.verify(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_verify_tampered_expired_token_is_invalid_not_expired() {
        let mut config = config();
        config.access_ttl = Duration::minutes(-5);
        let manager = TokenManager::new(config).unwrap();

        let pair = manager
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        let result = manager.verify(&tamper_signature(&pair.access_token));
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let other = TokenManager::new(TokenConfig {
            secret: "another-secret".to_string(),
            ..config()
        })
        .unwrap();

        let pair = other
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            manager().verify(&pair.access_token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_audience_mismatch() {
        let other = TokenManager::new(TokenConfig {
            audience: "admins".to_string(),
            ..config()
        })
        .unwrap();

        let pair = other
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            manager().verify(&pair.access_token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_issuer_mismatch() {
        let other = TokenManager::new(TokenConfig {
            issuer: "someone-else".to_string(),
            ..config()
        })
        .unwrap();

        let pair = other
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            manager().verify(&pair.access_token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_garbage() {
        let result = manager().verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_refresh_pair_issues_new_pair_for_same_session() {
        let manager = manager();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let pair = manager.issue_pair(user_id, "a@b.com", session_id).unwrap();

        let refreshed = manager
            .refresh_pair(&pair.refresh_token, session_id)
            .unwrap();

        let claims = manager.verify(&refreshed.access_token).unwrap();
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.user_id, user_id);
        assert_ne!(refreshed.refresh_token, pair.refresh_token);
    }

    #[test]
    fn test_refresh_pair_rejects_access_token() {
        let manager = manager();
        let session_id = Uuid::new_v4();
        let pair = manager
            .issue_pair(Uuid::new_v4(), "a@b.com", session_id)
            .unwrap();

        let result = manager.refresh_pair(&pair.access_token, session_id);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_refresh_pair_rejects_other_session() {
        let manager = manager();
        let pair = manager
            .issue_pair(Uuid::new_v4(), "a@b.com", Uuid::new_v4())
            .unwrap();

        let result = manager.refresh_pair(&pair.refresh_token, Uuid::new_v4());
        assert_eq!(result, Err(TokenError::SessionMismatch));
    }

    #[test]
    fn test_token_pair_serializes_with_snake_case_fields() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 42,
        };

        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "access_token": "a", "refresh_token": "r", "expires_at": 42 })
        );
    }
}
