//! Recovery middleware for handling errors, panics, and timeouts.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{ErrorKind, error_chain};

/// Tracing target for error recovery.
const TRACING_TARGET_ERROR: &str = "ipreverser_server::recovery::error";

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "ipreverser_server::recovery::panic";

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum duration in seconds to wait for a request to complete before
    /// timing out. Requests exceeding this receive a 408 response.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value = "30")
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30,
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers recovery middleware with the provided configuration.
    ///
    /// Handler panics become `500` and elapsed requests become `408`, both
    /// with the usual JSON error body.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(middlewares)
    }
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        tracing::warn!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "Request timeout exceeded"
        );

        ErrorKind::RequestTimeout.into_error()
    } else {
        ErrorKind::InternalServerError.with_context(error_chain(err.as_ref()))
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "Service panic"
    );

    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler exploded")
    }

    async fn sleeping() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }

    fn create_test_server(config: &RecoveryConfig) -> anyhow::Result<TestServer> {
        let router: Router = Router::new()
            .route("/panic", get(panicking))
            .route("/slow", get(sleeping))
            .route("/ok", get(|| async { "ok" }))
            .with_recovery(config);
        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() -> anyhow::Result<()> {
        let server = create_test_server(&RecoveryConfig::default())?;

        let response = server.get("/panic").await;
        response.assert_status_internal_server_error();
        response.assert_json(&json!({ "error": "Internal server error" }));
        Ok(())
    }

    #[tokio::test]
    async fn timeout_becomes_request_timeout() -> anyhow::Result<()> {
        let server = create_test_server(&RecoveryConfig::with_timeout_secs(0))?;

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::REQUEST_TIMEOUT);
        response.assert_json(&json!({ "error": "Request timeout" }));
        Ok(())
    }

    #[tokio::test]
    async fn passes_successful_requests() -> anyhow::Result<()> {
        let server = create_test_server(&RecoveryConfig::default())?;

        let response = server.get("/ok").await;
        response.assert_status_ok();
        response.assert_text("ok");
        Ok(())
    }

    #[test]
    fn timeout_duration() {
        let config = RecoveryConfig::with_timeout_secs(12);
        assert_eq!(config.request_timeout(), Duration::from_secs(12));
    }
}
