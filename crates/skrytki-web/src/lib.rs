//! HTTP interface for skrytki.
//!
//! Routes:
//! - `GET /` landing page
//! - `GET /search/:text` and `GET /search?query=…` JSON search results
//! - `GET /get_uris/:id` every mailbox address of one entity

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use skrytki_search::{LookupService, DEFAULT_LIMIT};

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Shared state of all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<LookupService>,
    /// Limit used when a search request does not give one.
    pub default_limit: usize,
}

impl AppState {
    #[must_use]
    pub fn new(service: LookupService) -> Self {
        Self {
            service: Arc::new(service),
            default_limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search_query))
        .route("/search/:text", get(handlers::search_path))
        .route("/get_uris/:id", get(handlers::get_uris))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
