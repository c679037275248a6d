//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the financing engine and budget variance
//! - JSON error responses
//!
//! The handlers hold no state between requests beyond read-only configuration.

pub mod routes;

use axum::Router;
use civica_shared::FinancingConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Financing engine settings.
    pub financing: Arc<FinancingConfig>,
}

impl AppState {
    /// Creates the state from loaded configuration.
    #[must_use]
    pub fn new(financing: FinancingConfig) -> Self {
        Self {
            financing: Arc::new(financing),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
