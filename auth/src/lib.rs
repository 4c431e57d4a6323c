//! Credential primitives for the authentication service
//!
//! Provides the two stateless leaves the session layer is built on:
//! - Password hashing (Argon2id)
//! - Signed access/refresh token pairs (HS256 JWT)
//!
//! Neither component touches storage. Revocation is enforced by whoever owns
//! the sessions these tokens are bound to.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{TokenConfig, TokenKind, TokenManager};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let manager = TokenManager::new(TokenConfig {
//!     secret: "s3cret".to_string(),
//!     issuer: "app".to_string(),
//!     audience: "app-users".to_string(),
//!     access_ttl: Duration::minutes(15),
//!     refresh_ttl: Duration::hours(720),
//! })
//! .unwrap();
//!
//! let session_id = Uuid::new_v4();
//! let pair = manager.issue_pair(Uuid::new_v4(), "a@b.com", session_id).unwrap();
//!
//! let claims = manager.verify(&pair.access_token).unwrap();
//! assert_eq!(claims.token_type, TokenKind::Access);
//! assert_eq!(claims.session_id, session_id);
//!
//! let rotated = manager.refresh_pair(&pair.refresh_token, session_id).unwrap();
//! assert_ne!(rotated.refresh_token, pair.refresh_token);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenConfig;
pub use token::TokenError;
pub use token::TokenKind;
pub use token::TokenManager;
pub use token::TokenPair;
