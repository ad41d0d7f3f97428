#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use ipreverser_server::handler::routes;
use ipreverser_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityHeadersConfig,
};
use ipreverser_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "ipreverser_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "ipreverser_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "ipreverser_cli::config";

#[tokio::main]
async fn main() {
    let started_at = Instant::now();
    let Err(error) = run(started_at).await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run(started_at: Instant) -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting ipreverser"
    );

    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service)
        .await?
        .with_started_at(started_at);
    let router = create_router(state.clone(), &cli.middleware);

    let served = server::serve(router, cli.server).await;
    state.close().await;
    served.context("HTTP server failed")?;

    Ok(())
}

/// Connects to the database and prepares the schema.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to initialize the record store")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs, tracing spans, request log
/// 3. Security - CORS, security headers, compression
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}
