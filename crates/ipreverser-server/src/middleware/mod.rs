//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security: CORS, response security headers, body limits, compression
//! - Observability: request IDs, tracing spans, per-request log line
//! - Recovery: panics and timeouts become JSON error responses
//!
//! # Quick Start
//!
//! ```rust
//! use axum::Router;
//! use ipreverser_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt,
//!     RouterSecurityExt, SecurityHeadersConfig,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::{RouterObservabilityExt, log_request};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt, SecurityHeadersConfig};
