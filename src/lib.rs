//! Maintenance Window Service
//!
//! Finds historical spans during which every tracked vCenter cluster was
//! simultaneously safe for maintenance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  MAINTENANCE WINDOW SERVICE                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   rows    ┌───────────────────────────────┐  │
//! │  │  API      │ ────────▶ │  Window Optimizer (pure)      │  │
//! │  │  (Axum)   │ ◀──────── │  daily → safe days → windows  │  │
//! │  └─────┬─────┘  result   │  → rank → recommendations     │  │
//! │        │                 └───────────────────────────────┘  │
//! │        ▼                                                    │
//! │  ┌─────────────┐                                            │
//! │  │ PostgreSQL  │  cluster_safety_checks (written by prober) │
//! │  └─────────────┘                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod optimizer;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let maintenance_routes = Router::new()
        .route("/api/v1/maintenance/optimal-windows", post(handlers::maintenance::optimal_windows))
        .route("/api/v1/maintenance/analyze", post(handlers::maintenance::analyze))
        .route("/api/v1/maintenance/clusters", get(handlers::maintenance::list_clusters));

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(maintenance_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
