use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Metrics, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use tokio::task::JoinHandle;

use super::custom_hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CLIENT,
    TRACING_TARGET_CONNECTION,
};

/// Connection pool status information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of idle connections ready to be handed out
    pub available: usize,
    /// Number of requests waiting for a connection
    pub waiting: usize,
}

/// Pooled PostgreSQL client.
///
/// Cheap to clone; all clones share one pool. Every call to
/// [`get_connection`](Self::get_connection) borrows a connection that returns
/// to the pool when dropped, whether the operation using it succeeded or not.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a client and its pool without opening any connection.
    ///
    /// Connections are established lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection URL cannot be assembled or the pool
    /// cannot be built.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CLIENT, "Initializing database client");

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);
        let manager =
            AsyncDieselConnectionManager::new_with_config(config.database_url()?, manager_config);

        let timeout = Some(config.connection_timeout());
        let pool = Pool::builder(manager)
            .max_size(config.db_max_connections as usize)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle))
            .post_recycle(Hook::sync_fn(custom_hooks::post_recycle))
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create connection pool");
                PgError::Unexpected(format!("Failed to build connection pool: {e}").into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// Waits up to the configured acquisition timeout for a free connection.
    ///
    /// # Errors
    ///
    /// Returns [`PgError::Timeout`] when the pool stays exhausted for the whole
    /// timeout, or a connection error when a new connection cannot be opened.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn::new(conn))
    }

    /// Gets a raw pooled connection from the pool.
    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(PgError::from)
    }

    /// Runs `SELECT 1` on a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns the acquisition or query error.
    pub async fn ping(&self) -> PgResult<()> {
        let mut conn = self.get_pooled_connection().await?;
        diesel::sql_query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// Returns whether a trivial round trip to the database succeeds.
    ///
    /// Never fails; errors are logged and reported as `false`.
    pub async fn health_check(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET_CLIENT, error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Closes connections that have been idle longer than the idle timeout.
    ///
    /// Returns the number of connections closed.
    pub fn reap_idle_connections(&self) -> usize {
        let idle_timeout = self.inner.config.idle_timeout();
        let result = self
            .inner
            .pool
            .retain(|_, metrics: Metrics| metrics.last_used() < idle_timeout);

        let removed = result.removed.len();
        if removed > 0 {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                removed,
                retained = result.retained,
                "Closed idle database connections"
            );
        }

        removed
    }

    /// Spawns a background task that periodically reaps idle connections.
    ///
    /// The task stops once the pool is [closed](Self::close).
    pub fn spawn_idle_reaper(&self) -> JoinHandle<()> {
        let this = self.clone();
        let period = self.inner.config.idle_timeout();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if this.inner.pool.is_closed() {
                    tracing::debug!(target: TRACING_TARGET_CONNECTION, "Pool closed, stopping idle reaper");
                    break;
                }

                this.reap_idle_connections();
            }
        })
    }

    /// Closes the pool; pending and future acquisitions fail.
    pub fn close(&self) {
        tracing::info!(target: TRACING_TARGET_CLIENT, "Closing database connection pool");
        self.inner.pool.close();
    }

    /// Gets the current pool status.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_max_size", &pool_status.max_size)
            .field("pool_size", &pool_status.size)
            .field("pool_available", &pool_status.available)
            .field("pool_waiting", &pool_status.waiting)
            .finish()
    }
}

/// A pooled database connection.
///
/// Repository traits such as [`IpRecordRepository`] are reachable through
/// [`Deref`] to the underlying [`PgConnection`]. The connection returns to the
/// pool when dropped.
///
/// [`IpRecordRepository`]: crate::query::IpRecordRepository
/// [`PgConnection`]: crate::PgConnection
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Wraps a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_does_not_connect() -> PgResult<()> {
        let client = PgClient::new(PgConfig::default().with_port(1))?;
        let status = client.pool_status();
        assert_eq!(status.max_size, 20);
        assert_eq!(status.size, 0);
        assert!(format!("{client:?}").contains("***"));
        Ok(())
    }

    #[tokio::test]
    async fn closed_pool_reports_unhealthy() -> PgResult<()> {
        let client = PgClient::new(PgConfig::default().with_port(1))?;
        client.close();
        assert!(!client.health_check().await);
        assert_eq!(client.reap_idle_connections(), 0);
        Ok(())
    }
}
