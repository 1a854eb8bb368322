use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::errors::service_error_to_response;
use crate::app::services::BankService;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn status(Extension(services): Extension<Arc<BankService>>) -> Response {
    match services.status().await {
        Ok(view) => Json(view).into_response(),
        Err(e) => service_error_to_response(e),
    }
}
