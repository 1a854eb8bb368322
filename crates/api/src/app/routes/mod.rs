use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod events;
pub mod system;
pub mod transfers;

/// Router for every ledger endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/status", get(system::status))
        .route("/accounts", get(accounts::list))
        .route("/accounts/:number", get(accounts::get_one))
        .route("/accounts/:number/deposit", post(accounts::deposit))
        .route("/accounts/:number/withdraw", post(accounts::withdraw))
        .route("/accounts/:number/events", get(events::stream))
        .route("/transfers", post(transfers::create))
}
