use auth::TokenPair;

use crate::domain::session::models::ClientMetadata;
use crate::domain::session::models::SessionId;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;

/// Command to register a new account and open its first session
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub client: ClientMetadata,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (hashed by the service)
    /// * `client` - Client details recorded on the session
    pub fn new(email: EmailAddress, password: String, client: ClientMetadata) -> Self {
        Self {
            email,
            password,
            client,
        }
    }
}

/// Command to open a session with existing credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
    pub client: ClientMetadata,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String, client: ClientMetadata) -> Self {
        Self {
            email,
            password,
            client,
        }
    }
}

/// Outcome of a successful register or login.
#[derive(Debug, Clone)]
pub struct Authentication {
    pub user: User,
    pub session_id: SessionId,
    pub tokens: TokenPair,
}
