use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenManager;
use auth_service::config::Config;
use auth_service::domain::auth::ports::AuthServicePort;
use auth_service::domain::auth::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::sweeper::SessionSweeper;
use auth_service::outbound::repositories::PostgresSessionRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const SWEEP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token = ?config.token,
        session_ttl_hours = config.session.ttl_hours,
        cleanup_interval_seconds = config.session.cleanup_interval_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_manager = Arc::new(TokenManager::new(config.token.to_token_config())?);
    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let session_repository = Arc::new(PostgresSessionRepository::new(pg_pool));

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(
        AuthService::new(
            user_repository,
            session_repository,
            token_manager,
            config.session.ttl(),
        )
        .with_password_hasher(password_hasher),
    );

    let sweeper = SessionSweeper::new(
        Arc::clone(&auth_service),
        config.session.cleanup_interval(),
        SWEEP_TIMEOUT,
    );
    tokio::spawn(async move {
        sweeper.run().await;
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(
        auth_service,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    axum::serve(
        listener,
        application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
