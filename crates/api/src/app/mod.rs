//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: the request handler (`BankService`) and its construction
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: status mapping and JSON error bodies

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an already-wired service.
pub fn build_app(services: Arc<services::BankService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(Extension(services)),
        )
}
