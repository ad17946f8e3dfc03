//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Error-to-response mapping
//! - CSV and XLSX exports of reports, HTML tickets

pub mod error;
pub mod export;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use punto_shared::config::BusinessConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Business identity printed on tickets.
    pub business: Arc<BusinessConfig>,
}

impl AppState {
    /// Builds the state from a connection and the business settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, business: BusinessConfig) -> Self {
        Self {
            db: Arc::new(db),
            business: Arc::new(business),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
