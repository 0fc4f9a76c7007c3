use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServerError;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies below this size are logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

/// Request bodies are buffered up to this size; larger ones are refused.
pub const MAX_REQUEST_BODY: usize = 2 * 1024 * 1024;

/// Attach a trace id to every request and log both bodies inside an
/// `http_request` span. A valid UUID in the incoming `x-trace-id` header is
/// reused; anything else is replaced.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let (parts, body) = req.into_parts();
        let limited = Body::new(Limited::new(body, MAX_REQUEST_BODY));
        let req_bytes = match buffer_and_log("request", &parts.headers, limited).await {
            Ok(bytes) => bytes,
            Err(e) if is_length_limit(&e) => {
                let mut response = ServerError::BadRequest(format!(
                    "request body too large; maximum is {MAX_REQUEST_BODY} bytes"
                ))
                .into_response();
                if let Some(value) = trace_header {
                    response.headers_mut().insert(X_TRACE_ID, value);
                }
                warn!(status = response.status().as_u16(), "← request body over limit");
                return response;
            }
            Err(_) => Bytes::new(),
        };
        let mut req = Request::from_parts(parts, Body::from(req_bytes));
        if let Some(value) = &trace_header {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let res_bytes = buffer_and_log("response", &parts.headers, body)
            .await
            .unwrap_or_default();
        let mut response = Response::from_parts(parts, Body::from(res_bytes));
        if let Some(value) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

async fn buffer_and_log(
    direction: &str,
    headers: &header::HeaderMap,
    body: Body,
) -> Result<Bytes, axum::Error> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(direction, error = %e, "failed to buffer body");
            return Err(e);
        }
    };

    if content_type.contains("application/json") && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            info!(direction, body = text, "body");
        }
    } else if !bytes.is_empty() {
        info!(direction, content_type, size = bytes.len(), "body skipped");
    }

    Ok(bytes)
}

fn is_length_limit(error: &axum::Error) -> bool {
    std::error::Error::source(error).is_some_and(|source| source.is::<LengthLimitError>())
}
