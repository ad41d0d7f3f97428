//! Request tracing with unique request IDs and a per-request log line.

use axum::Router;
use axum::extract::Request;
use axum::http::HeaderName;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use crate::extract::ClientIp;

/// Tracing target for access logging.
const TRACING_TARGET: &str = "ipreverser_server::middleware::access";

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers observability middleware for request tracing and logging.
    ///
    /// Generates an `x-request-id` for requests that carry none, echoes it
    /// on the response, opens a tracing span per request, marks the
    /// `authorization` and `cookie` headers sensitive and logs one line per
    /// request with the method, path and client address.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(from_fn(log_request))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetSensitiveRequestHeadersLayer::new([
                axum::http::header::AUTHORIZATION,
                axum::http::header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }
}

/// Logs the method, path and client address of every request.
pub async fn log_request(client_ip: ClientIp, request: Request, next: Next) -> Response {
    tracing::info!(
        target: TRACING_TARGET,
        method = %request.method(),
        path = request.uri().path(),
        client_ip = %client_ip,
        "Request received"
    );

    next.run(request).await
}
