//! # wareflow-api: REST Façade for Wareflow
//!
//! Domain services plus the axum handlers that expose them under `/api/v1`.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Lifecycle                               │
//! │                                                                         │
//! │  HTTP request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (tower-http)          span per request                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Extractors (extract.rs)          bad JSON / path / query → 400        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Handler (handlers/*.rs)          DTO → entity, missing fields → 422   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Service (services/*.rs)          rules, references, natural keys      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repositories (wareflow-db)       SQLite or in-memory                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {"data": ...}  or  {"message", "error", "code", "causes"}             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`error`] - `ApiError` and the status mapping
//! - [`extract`] - Extractors that reject with `ApiError`
//! - [`handlers`] - Route table and handlers
//! - [`services`] - Domain services
//! - [`state`] - `AppState` and the store selection

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{AppConfig, ConfigError, StorageKind};
pub use error::{ApiError, ApiResult};
pub use services::Services;
pub use state::{AppState, Store};

/// Prefix of every route.
pub const API_PREFIX: &str = "/api/v1";

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, handlers::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
