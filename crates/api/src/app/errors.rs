use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ledgercast_core::LedgerError;

use crate::app::services::ServiceError;

/// Status for a refused business operation.
pub fn rejection_status(rejection: Option<&LedgerError>) -> StatusCode {
    match rejection {
        None => StatusCode::OK,
        Some(LedgerError::NotFound) => StatusCode::NOT_FOUND,
        Some(LedgerError::InvalidOperation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Ledger(e @ LedgerError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ServiceError::Ledger(e @ LedgerError::InvalidOperation(_)) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_operation", e.to_string())
        }
        ServiceError::Task(e) => {
            tracing::error!(error = %e, "ledger task failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_client_errors() {
        assert_eq!(rejection_status(None), StatusCode::OK);
        assert_eq!(rejection_status(Some(&LedgerError::NotFound)), StatusCode::NOT_FOUND);
        assert_eq!(
            rejection_status(Some(&LedgerError::invalid("cannot deposit"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unknown_account_becomes_404() {
        let res = service_error_to_response(ServiceError::Ledger(LedgerError::NotFound));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
