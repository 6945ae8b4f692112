use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies with a known size at or below this are logged verbatim at
/// debug level. Everything else streams through untouched.
const MAX_LOGGED_BODY: usize = 1024;

/// Wrap every request in an `http_request` span keyed by a trace ID.
///
/// The ID is taken from the incoming `x-trace-id` header when it parses as a
/// UUID, otherwise generated, and is echoed on the response.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let (parts, body) = req.into_parts();
        let body = log_body("request", &parts.headers, body).await;
        let req = Request::from_parts(parts, body);

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let body = log_body("response", &parts.headers, body).await;
        let mut response = Response::from_parts(parts, body);

        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
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

/// Whether a body of this type and size may be buffered for logging.
fn loggable(content_type: &str, exact_len: Option<u64>) -> bool {
    content_type.contains("application/json")
        && exact_len.is_some_and(|len| len <= MAX_LOGGED_BODY as u64)
}

/// Log small JSON bodies and hand back an equivalent body.
///
/// Only bodies whose exact length is known up front and within
/// [`MAX_LOGGED_BODY`] are read; anything larger, streamed, or non-JSON is
/// returned as-is so size limits further down still apply before buffering.
async fn log_body(direction: &str, headers: &header::HeaderMap, body: Body) -> Body {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let exact_len = body.size_hint().exact();

    if !loggable(content_type, exact_len) {
        if exact_len != Some(0) {
            debug!(
                "{direction} body: [not logged: type={content_type}, size={}]",
                exact_len.map_or_else(|| "unknown".to_owned(), |n| n.to_string())
            );
        }
        return body;
    }

    match axum::body::to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => {
            if let Ok(text) = std::str::from_utf8(&bytes) {
                debug!("{direction} body: {text}");
            }
            Body::from(bytes)
        }
        Err(e) => {
            warn!(error = %e, "{direction} body could not be read");
            Body::empty()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_small_sized_json_is_logged() {
        assert!(loggable("application/json", Some(0)));
        assert!(loggable("application/json; charset=utf-8", Some(1024)));
        assert!(!loggable("application/json", Some(1025)));
        assert!(!loggable("application/json", None));
        assert!(!loggable("text/plain", Some(10)));
    }

    #[tokio::test]
    async fn oversized_body_is_passed_through_unread() {
        let payload = "x".repeat(MAX_LOGGED_BODY * 4);
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = log_body("request", &headers, Body::from(payload.clone())).await;
        assert_eq!(body.size_hint().exact(), Some(payload.len() as u64));
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(bytes.len(), payload.len());
    }

    #[tokio::test]
    async fn small_json_body_survives_logging() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = log_body("request", &headers, Body::from(r#"{"name":"Ann"}"#)).await;
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"name":"Ann"}"#);
    }
}
