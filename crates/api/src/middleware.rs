use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware.
///
/// - Assigns a request id (UUIDv7), available to handlers as `Extension<RequestContext>`
/// - Echoes it back in the `x-request-id` response header
/// - Logs method, path, status and latency once the handler returns
///
/// For SSE responses the log line is written when the stream starts, not when it ends.
pub async fn request_logging(mut req: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::new();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ctx);

    let started = Instant::now();
    let mut res = next.run(req).await;

    let request_id = ctx.request_id().to_string();
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, v);
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    res
}
