use std::sync::Arc;
use std::time::{Duration, Instant};

use ipreverser_core::{RecordStore, Result};

use crate::service::{PgRecordStore, ServiceConfig, TRACING_TARGET};

/// Shared handle to the record store.
pub type RecordStoreRef = Arc<dyn RecordStore>;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    store: RecordStoreRef,
    started_at: Instant,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Builds the database pool, starts its idle reaper and ensures the schema
    /// exists. Any failure is a startup error; no traffic should be accepted
    /// afterwards.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let client = config.create_postgres_client()?;
        let store = PgRecordStore::new(client.clone());
        store.initialize().await?;
        let store = store.with_idle_reaper();

        let pool_status = client.pool_status();
        tracing::info!(
            target: TRACING_TARGET,
            pool_max_size = pool_status.max_size,
            pool_size = pool_status.size,
            pool_available = pool_status.available,
            "Service state initialized"
        );

        Ok(Self::with_store(store))
    }

    /// Creates state around an already initialized store.
    pub fn with_store(store: impl RecordStore) -> Self {
        Self {
            store: Arc::new(store),
            started_at: Instant::now(),
        }
    }

    /// Measures uptime from `started_at` instead of from state creation.
    pub fn with_started_at(self, started_at: Instant) -> Self {
        Self { started_at, ..self }
    }

    /// Returns the record store.
    pub fn store(&self) -> &RecordStoreRef {
        &self.store
    }

    /// Returns the time elapsed since the recorded start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Releases the record store's resources.
    pub async fn close(&self) {
        tracing::info!(target: TRACING_TARGET, "Closing record store");
        self.store.close().await;
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("uptime", &self.uptime())
            .finish_non_exhaustive()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(store: RecordStoreRef);
