//! HTTP routing layer
//!
//! Routes share one [`AppState`] holding the graph store and the storefront
//! client; handlers build the per-request services from it.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use medshop_interfaces::{StorefrontAuth, StorefrontCatalog};

use crate::traits::GraphStore;

pub mod errors;
pub mod handlers;

pub use errors::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub graph_store: Arc<dyn GraphStore>,
    pub catalog: Arc<dyn StorefrontCatalog>,
    pub auth: Arc<dyn StorefrontAuth>,
}

/// Build the router for all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::node_count))
        .route("/health", get(handlers::health_check))
        .route("/products", get(handlers::sync_products))
        .route("/webhooks/shopify", post(handlers::shopify_webhook))
        .route("/auth/callback", get(handlers::auth_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
