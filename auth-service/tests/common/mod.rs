#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use auth::PasswordHasher;
use auth::TokenConfig;
use auth::TokenManager;
use auth_service::domain::auth::models::LoginCommand;
use auth_service::domain::auth::models::RegisterCommand;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::session::models::ClientMetadata;
use auth_service::domain::user::models::EmailAddress;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemorySessionRepository;
use auth_service::outbound::repositories::InMemoryUserRepository;
use chrono::Duration;

pub const SECRET: &str = "s3cret";
pub const ISSUER: &str = "app";
pub const AUDIENCE: &str = "app-users";

pub type TestAuthService = AuthService<InMemoryUserRepository, InMemorySessionRepository>;

/// Token settings shared by every test: 15 minute access, 30 day refresh.
pub fn token_config() -> TokenConfig {
    TokenConfig {
        secret: SECRET.to_string(),
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::hours(720),
    }
}

/// Argon2 with minimal cost so tests stay fast.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(8 * 1024, 1, 1).expect("valid argon2 params")
}

/// Auth service over fresh in-memory stores, with handles on those stores.
pub struct TestContext {
    pub service: Arc<TestAuthService>,
    pub users: InMemoryUserRepository,
    pub sessions: InMemorySessionRepository,
    pub token_manager: Arc<TokenManager>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = InMemoryUserRepository::new();
        let sessions = InMemorySessionRepository::new();
        let token_manager =
            Arc::new(TokenManager::new(token_config()).expect("valid token config"));

        let service = Arc::new(
            AuthService::new(
                Arc::new(users.clone()),
                Arc::new(sessions.clone()),
                Arc::clone(&token_manager),
                Duration::hours(720),
            )
            .with_password_hasher(fast_hasher()),
        );

        Self {
            service,
            users,
            sessions,
            token_manager,
        }
    }
}

pub fn email(address: &str) -> EmailAddress {
    EmailAddress::new(address.to_string()).expect("valid email")
}

pub fn register_command(address: &str, password: &str) -> RegisterCommand {
    RegisterCommand::new(email(address), password.to_string(), ClientMetadata::default())
}

pub fn login_command(address: &str, password: &str) -> LoginCommand {
    LoginCommand::new(email(address), password.to_string(), ClientMetadata::default())
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub context: TestContext,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let context = TestContext::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(context.service.clone(), StdDuration::from_secs(10));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            port,
            context,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account over HTTP and return the response body.
    pub async fn register(&self, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }
}
