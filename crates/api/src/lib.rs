//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for entries, expenses, export and uploads
//! - Token authentication middleware
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use nsgd_core::auth::OperatorAccount;
use nsgd_core::ledger::LedgerService;
use nsgd_core::storage::StorageService;
use nsgd_db::SeaLedgerStore;
use nsgd_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Largest accepted request body: 10 MiB.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// The single operator allowed to log in.
    pub operator: Arc<OperatorAccount>,
    /// Upload storage.
    pub storage: Arc<StorageService>,
}

impl AppState {
    /// Ledger service over this state's database and upload storage.
    #[must_use]
    pub fn ledger(&self) -> LedgerService<SeaLedgerStore> {
        LedgerService::new(
            Arc::new(SeaLedgerStore::new((*self.db).clone())),
            Arc::clone(&self.storage),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
        )
        .with_state(state)
}
