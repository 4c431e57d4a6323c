use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::domain::auth::ports::AuthServicePort;

/// Periodic removal of expired sessions.
///
/// Reads already discard an expired session when they find one; the sweep
/// catches the rows nobody reads again.
pub struct SessionSweeper {
    auth_service: Arc<dyn AuthServicePort>,
    interval: Duration,
    timeout: Duration,
}

impl SessionSweeper {
    /// Create a sweeper.
    ///
    /// # Arguments
    /// * `auth_service` - Service whose `cleanup_expired` is called each tick
    /// * `interval` - Time between sweeps; must be non-zero
    /// * `timeout` - Deadline for a single sweep
    pub fn new(auth_service: Arc<dyn AuthServicePort>, interval: Duration, timeout: Duration) -> Self {
        Self {
            auth_service,
            interval,
            timeout,
        }
    }

    /// Sweep on every tick until the task is dropped.
    ///
    /// This is a long-running task that should be spawned in a separate tokio task
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting session sweeper loop"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    /// Run one sweep and report how many sessions it removed.
    ///
    /// Failures are logged and reported as zero so the loop keeps going.
    pub async fn sweep_once(&self) -> u64 {
        match tokio::time::timeout(self.timeout, self.auth_service.cleanup_expired()).await {
            Ok(Ok(removed)) => {
                tracing::debug!(removed, "Session sweep finished");
                removed
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Session sweep failed");
                0
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis(),
                    "Session sweep timed out"
                );
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::TokenPair;
    use mockall::mock;

    use super::*;
    use crate::domain::auth::errors::AuthError;
    use crate::domain::auth::models::Authentication;
    use crate::domain::auth::models::LoginCommand;
    use crate::domain::auth::models::RegisterCommand;
    use crate::domain::session::models::Session;
    use crate::domain::session::models::SessionId;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(&self, command: RegisterCommand) -> Result<Authentication, AuthError>;
            async fn login(&self, command: LoginCommand) -> Result<Authentication, AuthError>;
            async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
            async fn logout(&self, session_id: &SessionId) -> Result<(), AuthError>;
            async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError>;
            async fn validate(&self, access_token: &str) -> Result<(User, Session), AuthError>;
            async fn deactivate(&self, user_id: &UserId) -> Result<(), AuthError>;
            async fn cleanup_expired(&self) -> Result<u64, AuthError>;
        }
    }

    fn sweeper(service: MockTestAuthService) -> SessionSweeper {
        SessionSweeper::new(
            Arc::new(service),
            Duration::from_secs(60),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_sweep_reports_removed_sessions() {
        let mut service = MockTestAuthService::new();
        service
            .expect_cleanup_expired()
            .times(1)
            .returning(|| Ok(3));

        assert_eq!(sweeper(service).sweep_once().await, 3);
    }

    #[tokio::test]
    async fn test_sweep_survives_store_failure() {
        let mut service = MockTestAuthService::new();
        service
            .expect_cleanup_expired()
            .times(1)
            .returning(|| Err(AuthError::DatabaseError("connection refused".to_string())));

        assert_eq!(sweeper(service).sweep_once().await, 0);
    }
}
