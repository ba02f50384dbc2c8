//! HTTP transport for the waiting line.
//!
//! A thin axum layer over [`api::QueueService`]: it extracts the bearer
//! credential, forwards to the service and maps errors to status codes.

pub mod config;
mod error;
mod handlers;
pub mod telemetry;

pub use error::{ApiError, ApiResult, ErrorResponse};

use api::QueueService;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: QueueService,
}

impl AppState {
    pub fn new(service: QueueService) -> Self {
        Self { service }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/queue", get(handlers::list))
        .route("/api/queue/events", get(handlers::events))
        .route("/api/join", post(handlers::join))
        .route("/api/complete/{id}", post(handlers::complete))
        .route("/api/clear", post(handlers::clear))
        .route("/api/admin/login", post(handlers::login))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
