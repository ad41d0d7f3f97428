//! Listing of recorded reversals.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use ipreverser_core::{DEFAULT_LIST_LIMIT, IpRecord};

use crate::handler::{Error, Result};
use crate::service::{RecordStoreRef, ServiceState};

/// Tracing target for record listing.
const TRACING_TARGET: &str = "ipreverser_server::handler::records";

/// Returns the most recent reversals, newest first.
#[tracing::instrument(skip_all)]
async fn list_records(State(store): State<RecordStoreRef>) -> Result<Json<Vec<IpRecord>>> {
    let records = store
        .list_recent(DEFAULT_LIST_LIMIT)
        .await
        .map_err(|e| Error::from(e).with_error("Failed to fetch records"))?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = records.len(),
        "Records listed"
    );

    Ok(Json(records))
}

/// Returns a [`Router`] with the record listing route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/ips", get(list_records))
}

#[cfg(test)]
mod tests {
    use ipreverser_core::{MemoryRecordStore, RecordStore};
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server_with_state, create_test_server_with_store};

    #[tokio::test]
    async fn empty_store_lists_nothing() -> anyhow::Result<()> {
        let server = create_test_server_with_store(MemoryRecordStore::new())?;

        let response = server.get("/ips").await;
        response.assert_status_ok();
        response.assert_json(&json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn lists_newest_first() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        store.store("1.1.1.1", "1.1.1.1").await?;
        store.store("1.2.3.4", "4.3.2.1").await?;
        let server = create_test_server_with_store(store)?;

        let response = server.get("/ips").await;
        response.assert_status_ok();

        let records = response.json::<Vec<IpRecord>>();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original_ip, "1.2.3.4");
        assert_eq!(records[1].original_ip, "1.1.1.1");
        Ok(())
    }

    #[tokio::test]
    async fn records_use_column_names() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        store.store("1.2.3.4", "4.3.2.1").await?;
        let server = create_test_server_with_store(store)?;

        let body = server.get("/ips").await.json::<serde_json::Value>();
        let record = &body[0];
        assert_eq!(record["id"], 1);
        assert_eq!(record["original_ip"], "1.2.3.4");
        assert_eq!(record["reversed_ip"], "4.3.2.1");
        assert!(record["created_at"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_bounded() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        for _ in 0..(DEFAULT_LIST_LIMIT + 5) {
            store.store("8.8.8.8", "8.8.8.8").await?;
        }
        let server = create_test_server_with_store(store)?;

        let records = server.get("/ips").await.json::<Vec<IpRecord>>();
        assert_eq!(records.len(), DEFAULT_LIST_LIMIT);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error() -> anyhow::Result<()> {
        let store = MemoryRecordStore::new();
        store.set_available(false);
        let state = ServiceState::with_store(store);
        let server = create_test_server_with_state(routes(), state)?;

        let response = server.get("/ips").await;
        response.assert_status_internal_server_error();
        response.assert_json(&json!({ "error": "Failed to fetch records" }));
        Ok(())
    }
}
