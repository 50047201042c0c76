//! # Gradebook HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /students` / `POST /students` - List / create students
//! - `PUT /students/{id}` / `DELETE /students/{id}` - Replace / remove a student
//! - `GET|POST /teachers`, `PUT|DELETE /teachers/{id}` - Same for teachers
//! - `GET|POST /subjects`, `PUT|DELETE /subjects/{id}` - Same for subjects
//! - `POST /grades` - Record a grade (student, teacher and subject must exist)
//! - `GET /grades` - All grades, filterable by `student_id` / `subject_id`
//! - `GET /grades/{student_id}` - Grades of one student
//! - `GET /grades/average?student_id=&subject_id=` - Average in one subject
//! - `GET /roster` - Snapshot of every collection
//! - `GET /status` - Record counts
//! - `GET /health` - Health check
//!
//! ## Status Codes
//!
//! Every error body is `{"error": ..., "kind": ...}`, including rejected
//! bodies, path ids and query strings (`kind` = `invalid_request`).
//!
//! - `201` on create, `409` on duplicate id, `404` on any missing record or
//!   reference (and when there are no grades to average), `400` on an update
//!   id mismatch under the strict id policy, `429` when rate limited.

mod extract;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
// Re-export handlers and types for integration tests (via `gradebook::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    average_grade, create_grade, create_student, create_subject, create_teacher, delete_student,
    delete_subject, delete_teacher, health_handler, list_grades, list_students, list_subjects,
    list_teachers, roster_handler, status_handler, student_grades, update_student,
    update_subject, update_teacher,
};
pub use types::{
    AverageQuery, DeleteResponse, ErrorResponse, GradeFilter, HealthResponse, StatusResponse,
};

use crate::config::ServerConfig;
use crate::error::AppError;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, put},
};
use gradebook_core::Registry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the registry behind one lock, plus configuration.
#[derive(Clone)]
pub struct AppState {
    /// The registry. Writers hold the lock across check-and-mutate.
    pub registry: Arc<RwLock<Registry>>,
    /// Configuration the router was built from.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create app state with a registry and default configuration.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, ServerConfig::default())
    }

    /// Create app state with a registry and explicit configuration.
    #[must_use]
    pub fn with_config(registry: Registry, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build CORS layer from the configured origins.
///
/// - `["*"]`: any origin
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::info!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .map(HeaderValue::from_static)
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/roster", get(handlers::roster_handler))
        .route(
            "/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/students/{id}",
            put(handlers::update_student).delete(handlers::delete_student),
        )
        .route(
            "/teachers",
            get(handlers::list_teachers).post(handlers::create_teacher),
        )
        .route(
            "/teachers/{id}",
            put(handlers::update_teacher).delete(handlers::delete_teacher),
        )
        .route(
            "/subjects",
            get(handlers::list_subjects).post(handlers::create_subject),
        )
        .route(
            "/subjects/{id}",
            put(handlers::update_subject).delete(handlers::delete_subject),
        )
        .route(
            "/grades",
            get(handlers::list_grades).post(handlers::create_grade),
        )
        .route("/grades/average", get(handlers::average_grade))
        .route("/grades/{student_id}", get(handlers::student_grades));

    match create_rate_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    tracing::info!(id_policy = ?config.id_policy(), "Update id policy configured");

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&config.cors_origins))
                .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(config: ServerConfig, registry: Registry) -> Result<(), AppError> {
    let addr = config.bind_addr();
    let state = AppState::with_config(registry, config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Gradebook HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, serve until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
