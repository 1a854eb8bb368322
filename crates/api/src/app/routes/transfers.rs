use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::dto::{TransferRequest, TransferResponse};
use crate::app::errors::{rejection_status, service_error_to_response};
use crate::app::services::BankService;

pub async fn create(
    Extension(services): Extension<Arc<BankService>>,
    Json(body): Json<TransferRequest>,
) -> Response {
    match services
        .transfer(body.from_account, body.to_account, body.amount)
        .await
    {
        Ok(result) => (
            rejection_status(result.rejection.as_ref()),
            Json(TransferResponse::from(&result)),
        )
            .into_response(),
        Err(e) => service_error_to_response(e),
    }
}
