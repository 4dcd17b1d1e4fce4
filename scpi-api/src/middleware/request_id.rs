//! Request ID middleware.

use axum::{
    body::Body,
    http::{
        HeaderValue, Request,
        header::{CONTENT_LENGTH, HeaderName},
    },
    response::Response,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use scpi_telemetry::spans::request_span;

use crate::error::ErrorResponse;

/// Request ID header name.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied request id that is kept as is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID extracted from or generated for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generates a new request ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Uses the client's `x-request-id` when it is printable and short enough.
    #[must_use]
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_REQUEST_ID_LEN)
            .map_or_else(Self::generate, |s| Self(s.to_string()))
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layer for adding request IDs.
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Creates a new request ID layer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that adds request IDs and runs the request inside a `request` span.
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = RequestId::from_header(request.headers().get(&REQUEST_ID_HEADER));
        let span = request_span(
            request_id.as_str(),
            request.method().as_str(),
            request.uri().path(),
        );

        request.extensions_mut().insert(request_id.clone());

        // Take the service that was driven to readiness, leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;

                tracing::Span::current().record("status", response.status().as_u16());
                stamp_error_body(&mut response, &request_id);
                if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                    response.headers_mut().insert(&REQUEST_ID_HEADER, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Rewrites an API error body so it carries the request id.
fn stamp_error_body(response: &mut Response, request_id: &RequestId) {
    let Some(body) = response.extensions_mut().remove::<ErrorResponse>() else {
        return;
    };
    let body = body.with_request_id(request_id.as_str());
    if let Ok(bytes) = serde_json::to_vec(&body) {
        response.headers_mut().remove(CONTENT_LENGTH);
        *response.body_mut() = Body::from(bytes);
    }
}

/// Extractor for request ID.
impl<S> axum::extract::FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1.as_str(), id2.as_str());
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn test_request_id_from_header() {
        let value = HeaderValue::from_static("custom-id-123");
        assert_eq!(RequestId::from_header(Some(&value)).as_str(), "custom-id-123");
    }

    #[test]
    fn test_oversized_or_blank_header_replaced() {
        let long = HeaderValue::from_str(&"x".repeat(MAX_REQUEST_ID_LEN + 1)).unwrap();
        assert!(Uuid::parse_str(RequestId::from_header(Some(&long)).as_str()).is_ok());

        let blank = HeaderValue::from_static("  ");
        assert!(Uuid::parse_str(RequestId::from_header(Some(&blank)).as_str()).is_ok());

        assert!(Uuid::parse_str(RequestId::from_header(None).as_str()).is_ok());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId("test-id".to_string());
        assert_eq!(format!("{id}"), "test-id");
    }
}
