//! Live balance-change stream for one account over Server-Sent Events.
//!
//! Each notification becomes one SSE message: `event` is the kind
//! (`DEPOSIT`, `TRANSFER_RECEIVED`, ...), `id` the event id, `data` the JSON
//! event. The stream has no end of its own; it stops when the client goes
//! away (the session is dropped and unregistered) or the server shuts down.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Path},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use tokio_stream::StreamExt;

use ledgercast_core::AccountNumber;
use ledgercast_events::NotificationEvent;

use crate::app::errors::service_error_to_response;
use crate::app::services::BankService;
use crate::context::RequestContext;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// GET /accounts/:number/events
pub async fn stream(
    Extension(services): Extension<Arc<BankService>>,
    Extension(ctx): Extension<RequestContext>,
    Path(number): Path<AccountNumber>,
) -> Response {
    let subscription = match services.subscribe(number).await {
        Ok(s) => s,
        Err(e) => return service_error_to_response(e),
    };
    if let Some(subscriber) = subscription.id() {
        tracing::info!(
            request_id = %ctx.request_id(),
            account = %subscription.account(),
            subscriber = %subscriber,
            "event stream opened"
        );
    }

    Sse::new(subscription.map(to_sse))
        .keep_alive(KeepAlive::new().interval(KEEP_ALIVE).text("keep-alive"))
        .into_response()
}

fn to_sse(event: NotificationEvent) -> Result<SseEvent, Infallible> {
    let sse = SseEvent::default()
        .event(event.kind().as_str())
        .id(event.event_id().to_string());

    Ok(match event.to_json() {
        Ok(data) => sse.data(data),
        Err(e) => {
            tracing::error!(event_id = %event.event_id(), error = %e, "failed to encode notification");
            sse.comment("unencodable event")
        }
    })
}
