use std::sync::Arc;

use async_trait::async_trait;
use ipreverser_core::{Error, IpRecord, RecordStore, Result};
use ipreverser_postgres::model::{self, NewIpRecord};
use ipreverser_postgres::query::IpRecordRepository;
use ipreverser_postgres::{PgClient, PgError, run_pending_migrations};
use tokio::task::JoinHandle;

use crate::service::TRACING_TARGET;

/// [`RecordStore`] backed by PostgreSQL.
///
/// Each operation borrows its own pooled connection, which returns to the pool
/// when the operation completes or fails.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    client: PgClient,
    idle_reaper: Option<Arc<JoinHandle<()>>>,
}

impl PgRecordStore {
    /// Wraps a pooled client.
    pub fn new(client: PgClient) -> Self {
        Self {
            client,
            idle_reaper: None,
        }
    }

    /// Starts the pool's idle connection reaper; it is stopped by [`close`].
    ///
    /// [`close`]: RecordStore::close
    pub fn with_idle_reaper(self) -> Self {
        Self {
            idle_reaper: Some(Arc::new(self.client.spawn_idle_reaper())),
            ..self
        }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &PgClient {
        &self.client
    }
}

fn storage_error(message: &'static str) -> impl FnOnce(PgError) -> Error {
    move |e| Error::storage().with_message(message).with_source(e)
}

fn into_record(record: model::IpRecord) -> IpRecord {
    IpRecord {
        id: record.id,
        original_ip: record.original_ip,
        reversed_ip: record.reversed_ip,
        created_at: record.created_at.into(),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn initialize(&self) -> Result<()> {
        let applied = run_pending_migrations(&self.client).await.map_err(|e| {
            Error::startup()
                .with_message("Failed to initialize database schema")
                .with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            applied_migrations = applied.len(),
            "Record store initialized"
        );
        Ok(())
    }

    async fn store(&self, original_ip: &str, reversed_ip: &str) -> Result<IpRecord> {
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(storage_error("Failed to acquire database connection"))?;

        let record = conn
            .create_ip_record(NewIpRecord::new(original_ip, reversed_ip))
            .await
            .map_err(storage_error("Failed to insert record"))?;

        Ok(into_record(record))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<IpRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self
            .client
            .get_connection()
            .await
            .map_err(storage_error("Failed to acquire database connection"))?;

        let records = conn
            .list_recent_ip_records(limit)
            .await
            .map_err(storage_error("Failed to list records"))?;

        Ok(records.into_iter().map(into_record).collect())
    }

    async fn health_check(&self) -> bool {
        self.client.health_check().await
    }

    async fn close(&self) {
        if let Some(idle_reaper) = &self.idle_reaper {
            idle_reaper.abort();
        }

        self.client.close();
    }
}

#[cfg(test)]
mod tests {
    use ipreverser_core::ErrorKind;
    use ipreverser_postgres::PgConfig;

    use super::*;

    /// Points at a port nothing listens on.
    fn unreachable_store() -> anyhow::Result<PgRecordStore> {
        let config = PgConfig::default()
            .with_host("127.0.0.1")
            .with_port(1);
        Ok(PgRecordStore::new(PgClient::new(config)?))
    }

    #[tokio::test]
    async fn store_fails_with_storage_error() -> anyhow::Result<()> {
        let store = unreachable_store()?;

        let error = store.store("1.2.3.4", "4.3.2.1").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Storage);
        Ok(())
    }

    #[tokio::test]
    async fn list_recent_fails_with_storage_error() -> anyhow::Result<()> {
        let store = unreachable_store()?;

        let error = store.list_recent(10).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Storage);
        Ok(())
    }

    #[tokio::test]
    async fn initialize_fails_with_startup_error() -> anyhow::Result<()> {
        let store = unreachable_store()?;

        let error = store.initialize().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Startup);
        Ok(())
    }

    #[tokio::test]
    async fn health_check_reports_unreachable_database() -> anyhow::Result<()> {
        let store = unreachable_store()?;
        assert!(!store.health_check().await);
        Ok(())
    }

    #[tokio::test]
    async fn close_stops_reaper_and_pool() -> anyhow::Result<()> {
        let store = unreachable_store()?.with_idle_reaper();
        store.close().await;

        let error = store.list_recent(10).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Storage);
        assert!(!store.health_check().await);
        Ok(())
    }
}
