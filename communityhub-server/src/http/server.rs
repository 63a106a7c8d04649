//! Axum server setup
//!
//! Server skeleton with:
//! - Health gate in front of every route except `/api/health`
//! - CORS for the browser frontend
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use sqlx::MySqlPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{gate, routes};
use crate::config::{DatabaseConfig, Environment};
use crate::db::{ConnectionManager, DatabaseBackend, MySqlBackend};

/// Liveness endpoint, exempt from the health gate
pub const HEALTH_PATH: &str = "/api/health";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true, the frontend is served separately)
    ///
    /// When false only the local development frontend origins are allowed.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: true,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: ConnectionManager,
    /// Pooled handle used by request handlers once the gate has passed
    pub pool: MySqlPool,
    pub environment: Environment,
    pub health_path: &'static str,
}

impl AppState {
    /// State backed by a real MySQL/TiDB pool.
    pub fn new(config: DatabaseConfig) -> Self {
        let backend = MySqlBackend::new(&config);
        let pool = backend.pool().clone();
        Self::with_backend(config, Arc::new(backend), pool)
    }

    pub fn with_backend(
        config: DatabaseConfig,
        backend: Arc<dyn DatabaseBackend>,
        pool: MySqlPool,
    ) -> Self {
        let environment = config.environment;
        Self {
            db: ConnectionManager::new(config, backend),
            pool,
            environment,
            health_path: HEALTH_PATH,
        }
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        return CorsLayer::permissive();
    }

    // Local frontend dev servers only
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::root::router())
        .merge(routes::health::router())
        .merge(routes::dashboard::router())
        .merge(routes::events::router())
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_database,
        ))
        .layer(cors_layer(config.cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// Starts a connection cycle in the background so the first requests
/// find it already in flight.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(DatabaseConfig::new(Environment::Development));
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(
        service = crate::SERVICE_NAME,
        environment = %state.environment,
        "Starting CommunityHub API"
    );

    let db = state.db.clone();
    tokio::spawn(async move {
        if !db.ensure_connected().await {
            tracing::warn!("Starting without a database connection; gated routes will return 503");
        }
    });

    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{Script, ScriptedBackend};
    use crate::db::ConnectError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::mysql::MySqlPoolOptions;
    use tower::ServiceExt;

    fn router(environment: Environment, backend: Arc<ScriptedBackend>) -> Router {
        let mut config = DatabaseConfig::new(environment);
        config.host = Some("db.internal".into());
        // Handlers that reach the pool are not exercised here
        let pool = MySqlPoolOptions::new().connect_lazy("mysql://root@127.0.0.1:1/none").unwrap();
        let state = AppState::with_backend(config, backend, pool);
        build_router(state, &ServerConfig::default())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.cors_permissive);
    }

    #[tokio::test]
    async fn gated_route_passes_when_connected() {
        let app = router(Environment::Development, ScriptedBackend::new(vec![Script::Ok]));

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"CommunityHub API is running...");
    }

    #[tokio::test]
    async fn gated_route_returns_503_when_unreachable() {
        let backend = ScriptedBackend::failing(ConnectError::Network("refused".into()));
        let app = router(Environment::Production, backend.clone());

        let response = app.oneshot(get("/api/events")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Database connection unavailable");
        assert_eq!(body["details"], "network failure: refused");
        assert_eq!(backend.authenticate_calls(), 1);
    }

    #[tokio::test]
    async fn health_bypasses_gate_when_disconnected() {
        let backend = ScriptedBackend::failing(ConnectError::Network("refused".into()));
        let app = router(Environment::Production, backend.clone());

        let response = app.oneshot(get(HEALTH_PATH)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["environment"], "production");
        assert_eq!(body["database"], "network failure: refused");
        assert!(body["timestamp"].is_string());
        // Only the probe ran, no connect cycle
        assert_eq!(backend.authenticate_calls(), 1);
    }

    #[tokio::test]
    async fn health_reports_connected() {
        let app = router(Environment::Development, ScriptedBackend::new(vec![Script::Ok]));

        let response = app.oneshot(get(HEALTH_PATH)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"], "connected");
    }

    #[tokio::test]
    async fn unknown_route_is_404_once_connected() {
        let app = router(Environment::Development, ScriptedBackend::new(vec![Script::Ok]));

        let response = app.oneshot(get("/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Not Found - /api/nope");
    }

    #[tokio::test]
    async fn invalid_event_id_is_404() {
        let app = router(Environment::Development, ScriptedBackend::new(vec![Script::Ok]));

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/events/abc")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Event not found");
    }

    #[tokio::test]
    async fn invalid_event_body_is_400() {
        let app = router(Environment::Development, ScriptedBackend::new(vec![Script::Ok]));

        let request = Request::builder()
            .method("POST")
            .uri("/api/events")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title": "Gala"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "date is required");
    }
}
