//! Liveness and store health checks.
//!
//! `/health` reports the process only and never touches the store, so a
//! database outage does not make the service look dead to an orchestrator.
//! `/health/store` performs the store round trip for readiness checks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jiff::Timestamp;

use crate::handler::response::{HealthResponse, HealthStatus, StoreHealthResponse};
use crate::service::{RecordStoreRef, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "ipreverser_server::handler::monitors";

async fn health_status(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Timestamp::now(),
        uptime: state.uptime().as_secs_f64(),
    })
}

#[tracing::instrument(skip_all)]
async fn store_health_status(
    State(store): State<RecordStoreRef>,
) -> (StatusCode, Json<StoreHealthResponse>) {
    let is_healthy = store.health_check().await;
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy,
        status_code = status_code.as_u16(),
        "Store health checked"
    );

    let response = StoreHealthResponse {
        status: is_healthy.into(),
        timestamp: Timestamp::now(),
    };

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/health", get(health_status))
        .route("/health/store", get(store_health_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use ipreverser_core::MemoryRecordStore;

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_store};

    #[tokio::test]
    async fn health_is_always_healthy() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body = response.json::<HealthResponse>();
        assert_eq!(body.status, HealthStatus::Healthy);
        assert!(body.uptime >= 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn health_ignores_store_outage() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        store.set_available(false);
        let server = create_test_server_with_store(store)?;

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].is_f64());
        Ok(())
    }

    #[tokio::test]
    async fn store_health_reports_reachable_store() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/health/store").await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<StoreHealthResponse>().status,
            HealthStatus::Healthy
        );
        Ok(())
    }

    #[tokio::test]
    async fn store_health_reports_outage() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        store.set_available(false);
        let server = create_test_server_with_store(store)?;

        let response = server.get("/health/store").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<StoreHealthResponse>().status,
            HealthStatus::Unhealthy
        );
        Ok(())
    }
}
