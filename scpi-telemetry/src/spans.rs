//! Span definitions.
//!
//! Pre-defined spans for the operations of the simulator:
//! - HTTP requests
//! - Portfolio simulations
//! - Authentication
//! - Catalog reads

use tracing::{Span, field, info_span};

/// Create a span for an HTTP request.
///
/// `status` is recorded once the response is known.
///
/// # Example
///
/// ```
/// use scpi_telemetry::spans::request_span;
///
/// let span = request_span("req-123", "POST", "/api/portfolio");
/// let _guard = span.enter();
/// span.record("status", 200);
/// ```
#[must_use]
pub fn request_span(request_id: &str, method: &str, path: &str) -> Span {
    info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = field::Empty,
        otel.kind = "server"
    )
}

/// Create a span for a portfolio simulation.
///
/// # Example
///
/// ```
/// use scpi_telemetry::spans::simulation_span;
///
/// let span = simulation_span(42, 3);
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn simulation_span(user_id: u64, holdings: usize) -> Span {
    info_span!("simulation", user_id = user_id, holdings = holdings)
}

/// Create a span for an authentication operation (`login`, `register`, `logout`).
///
/// Pass the e-mail through [`mask_email`](crate::masking::mask_email) first.
#[must_use]
pub fn auth_span(operation: &str, masked_email: &str) -> Span {
    info_span!(
        "auth",
        operation = %operation,
        email = %masked_email,
        user_id = field::Empty
    )
}

/// Create a span for a catalog read.
#[must_use]
pub fn catalog_span(operation: &str) -> Span {
    info_span!("catalog", operation = %operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_can_be_entered() {
        let request = request_span("req-1", "GET", "/api/scpis");
        let _request = request.enter();
        request.record("status", 200);

        let auth = auth_span("login", "u***@example.com");
        auth.record("user_id", 1);
        let _auth = auth.enter();

        let _simulation = simulation_span(1, 2).entered();
        let _catalog = catalog_span("list").entered();
    }
}
