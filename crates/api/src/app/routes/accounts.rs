use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use ledgercast_core::AccountNumber;

use crate::app::dto::{AccountList, AmountRequest};
use crate::app::errors::{rejection_status, service_error_to_response};
use crate::app::services::BankService;

pub async fn list(Extension(services): Extension<Arc<BankService>>) -> Response {
    match services.list_accounts().await {
        Ok(items) => Json(AccountList { items }).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<BankService>>,
    Path(number): Path<AccountNumber>,
) -> Response {
    match services.get_account(number).await {
        Ok(view) if view.found => Json(view).into_response(),
        Ok(view) => (StatusCode::NOT_FOUND, Json(view)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn deposit(
    Extension(services): Extension<Arc<BankService>>,
    Path(number): Path<AccountNumber>,
    Json(body): Json<AmountRequest>,
) -> Response {
    match services.deposit(number, body.amount).await {
        Ok(result) => (rejection_status(result.rejection.as_ref()), Json(result)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn withdraw(
    Extension(services): Extension<Arc<BankService>>,
    Path(number): Path<AccountNumber>,
    Json(body): Json<AmountRequest>,
) -> Response {
    match services.withdraw(number, body.amount).await {
        Ok(result) => (rejection_status(result.rejection.as_ref()), Json(result)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}
