//! Request middleware: correlation id and request metrics.

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super_tools_core::types::CorrelationId;
use super_tools_governance::track_request;

/// Lower-case form of the correlation header, as stored by `http`.
pub static CORRELATION_HEADER_NAME: HeaderName = HeaderName::from_static("x-correlation-id");

/// Read or generate the correlation id, expose it to handlers as an
/// extension, and echo it on the response.
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_header(
        request
            .headers()
            .get(&CORRELATION_HEADER_NAME)
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(correlation_id.clone());

    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let start = Instant::now();

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        "Request received"
    );

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response
            .headers_mut()
            .insert(CORRELATION_HEADER_NAME.clone(), value);
    }

    let status = response.status().as_u16();
    track_request(&method, &path, status, start.elapsed().as_secs_f64());
    tracing::info!(
        correlation_id = %correlation_id,
        status,
        "Request completed"
    );

    response
}
