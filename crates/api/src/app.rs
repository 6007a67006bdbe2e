//! HTTP API application wiring (Axum router + store wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request query parameters
//! - `errors.rs`: consistent error responses and query-value parsing

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use catalog_infra::ProductStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// The store handle is injected per the dependency-passing rule: handlers see
/// it only through the `Extension`, never as ambient state.
pub fn build_app(store: Arc<dyn ProductStore>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/", get(routes::system::index))
        .nest("/products", routes::products::router())
        .layer(ServiceBuilder::new().layer(Extension(store)))
}
