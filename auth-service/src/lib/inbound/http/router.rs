use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::deactivate::deactivate;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::logout_all::logout_all;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::status::status;
use super::middleware::optional_auth;
use super::middleware::require_auth;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
}

/// Build the HTTP router.
///
/// # Arguments
/// * `auth_service` - Service behind every route and both gateway middlewares
/// * `request_timeout` - Upper bound on a single request, store calls included
pub fn create_router(auth_service: Arc<dyn AuthServicePort>, request_timeout: Duration) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/logout-all", post(logout_all))
        .route("/api/auth/deactivate", post(deactivate))
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let optional_routes = Router::new()
        .route("/api/auth/status", get(status))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(optional_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use auth::TokenConfig;
    use auth::TokenManager;
    use axum::http::header::AUTHORIZATION;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::auth::service::AuthService;
    use crate::outbound::repositories::InMemorySessionRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn router() -> Router {
        let token_manager = TokenManager::new(TokenConfig {
            secret: "s3cret".to_string(),
            issuer: "app".to_string(),
            audience: "app-users".to_string(),
            access_ttl: chrono::Duration::minutes(15),
            refresh_ttl: chrono::Duration::hours(720),
        })
        .unwrap();

        let service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(token_manager),
            chrono::Duration::hours(720),
        )
        .with_password_hasher(PasswordHasher::with_params(8 * 1024, 1, 1).unwrap());

        create_router(Arc::new(service), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_route_with_bad_token() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/status")
                    .header(AUTHORIZATION, "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
