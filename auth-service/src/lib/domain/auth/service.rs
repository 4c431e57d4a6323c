use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenManager;
use auth::TokenPair;
use chrono::Duration;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Authentication;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::session::models::ClientMetadata;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for authentication and sessions.
///
/// Every access token is re-checked against live session state on use, so
/// deleting a session revokes its tokens before they expire. Holds no
/// mutable state of its own; atomicity is delegated to the repositories.
pub struct AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    user_repository: Arc<UR>,
    session_repository: Arc<SR>,
    token_manager: Arc<TokenManager>,
    password_hasher: PasswordHasher,
    session_ttl: Duration,
}

impl<UR, SR> AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - User persistence implementation
    /// * `session_repository` - Session persistence implementation
    /// * `token_manager` - Token signer/verifier
    /// * `session_ttl` - Lifetime of a session from login; must not be
    ///   shorter than the refresh token TTL
    pub fn new(
        user_repository: Arc<UR>,
        session_repository: Arc<SR>,
        token_manager: Arc<TokenManager>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
            token_manager,
            password_hasher: PasswordHasher::new(),
            session_ttl,
        }
    }

    /// Replace the default password hasher (e.g. with configured cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    async fn open_session(
        &self,
        user: &User,
        client: ClientMetadata,
    ) -> Result<(SessionId, TokenPair), AuthError> {
        let session_id = SessionId::new();
        let mut session = Session::new(session_id, user.id, client, self.session_ttl);

        let tokens = self
            .token_manager
            .issue_pair(user.id.0, user.email.as_str(), session_id.0)?;
        session.refresh_token = tokens.refresh_token.clone();

        self.session_repository.create(session).await?;

        tracing::info!(user_id = %user.id, session_id = %session_id, "Session opened");

        Ok((session_id, tokens))
    }

    /// Delete a session found past its expiry.
    ///
    /// The caller reports the session as invalid either way, so a failed
    /// delete is only logged; the sweep will get it later.
    async fn discard_expired(&self, session: &Session) {
        tracing::info!(
            session_id = %session.id,
            user_id = %session.user_id,
            expired_at = %session.expires_at,
            "Discarding expired session"
        );

        if let Err(e) = self.session_repository.delete(&session.id).await {
            tracing::error!(
                session_id = %session.id,
                error = %e,
                "Failed to delete expired session"
            );
        }
    }
}

#[async_trait]
impl<UR, SR> AuthServicePort for AuthService<UR, SR>
where
    UR: UserRepository,
    SR: SessionRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Authentication, AuthError> {
        // Advisory only; the store's unique constraint is the real guard.
        if self
            .user_repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists(command.email.to_string()));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let user = self
            .user_repository
            .create(User::new(command.email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let (session_id, tokens) = self.open_session(&user, command.client).await?;

        Ok(Authentication {
            user,
            session_id,
            tokens,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<Authentication, AuthError> {
        let user = match self.user_repository.find_by_email(&command.email).await? {
            Some(user) => user,
            None => {
                self.password_hasher.simulate_verify(&command.password);
                tracing::warn!(reason = "unknown_email", "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // A digest that cannot be read answers like a wrong password.
        let password_matches = match self
            .password_hasher
            .verify(&command.password, &user.password_hash)
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password digest is unreadable");
                false
            }
        };

        if !password_matches {
            tracing::warn!(user_id = %user.id, reason = "password_mismatch", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.id, reason = "inactive_user", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let (session_id, tokens) = self.open_session(&user, command.client).await?;

        Ok(Authentication {
            user,
            session_id,
            tokens,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.token_manager.verify(refresh_token)?;
        if !claims.is_refresh() {
            return Err(AuthError::InvalidToken(format!(
                "expected refresh token, got {}",
                claims.token_type
            )));
        }

        let mut session = self
            .session_repository
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired(Utc::now()) {
            self.discard_expired(&session).await;
            return Err(AuthError::InvalidSession);
        }

        if session.id.0 != claims.session_id || session.user_id.0 != claims.user_id {
            tracing::warn!(
                session_id = %session.id,
                claimed_session_id = %claims.session_id,
                "Refresh token does not match its session"
            );
            return Err(AuthError::InvalidSession);
        }

        let user = self
            .user_repository
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self
            .token_manager
            .issue_pair(user.id.0, user.email.as_str(), session.id.0)?;

        let session_id = session.id;
        session.rotate(tokens.refresh_token.clone());

        let rotated = self
            .session_repository
            .update(session, refresh_token)
            .await?;

        if !rotated {
            // Another refresh with the same token won the race.
            tracing::warn!(session_id = %session_id, "Refresh token already rotated");
            return Err(AuthError::SessionNotFound);
        }

        tracing::debug!(session_id = %session_id, user_id = %user.id, "Session refreshed");

        Ok(tokens)
    }

    async fn logout(&self, session_id: &SessionId) -> Result<(), AuthError> {
        self.session_repository.delete(session_id).await?;
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError> {
        let revoked = self.session_repository.delete_by_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "All sessions closed");
        Ok(revoked)
    }

    async fn validate(&self, access_token: &str) -> Result<(User, Session), AuthError> {
        let claims = self.token_manager.verify(access_token)?;
        if !claims.is_access() {
            return Err(AuthError::InvalidToken(format!(
                "expected access token, got {}",
                claims.token_type
            )));
        }

        let session = self
            .session_repository
            .find_by_id(&SessionId(claims.session_id))
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired(Utc::now()) {
            self.discard_expired(&session).await;
            return Err(AuthError::InvalidSession);
        }

        if session.user_id.0 != claims.user_id {
            return Err(AuthError::InvalidSession);
        }

        let user = self
            .user_repository
            .find_by_id(&UserId(claims.user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            if let Err(e) = self.session_repository.delete(&session.id).await {
                tracing::error!(session_id = %session.id, error = %e, "Failed to delete session of inactive user");
            }
            return Err(AuthError::InvalidCredentials);
        }

        Ok((user, session))
    }

    async fn deactivate(&self, user_id: &UserId) -> Result<(), AuthError> {
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.is_active = false;
        user.updated_at = Utc::now();
        self.user_repository.update(user).await?;

        let revoked = self.session_repository.delete_by_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "User deactivated");

        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, AuthError> {
        let removed = self.session_repository.delete_expired().await?;
        if removed > 0 {
            tracing::info!(removed, "Expired sessions swept");
        }
        Ok(removed)
    }
}
