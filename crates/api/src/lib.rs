//! HTTP API: configuration, request handler, routing and SSE delivery.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
