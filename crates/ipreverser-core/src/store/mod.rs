//! Persistence contract for reversal records.
//!
//! A [`RecordStore`] owns every [`IpRecord`] it has created and hands out
//! copies. Records are create-only: there is no update or delete. The
//! relational implementation lives in `ipreverser-postgres`; the
//! [`MemoryRecordStore`] here backs tests and local runs.

mod memory;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use self::memory::MemoryRecordStore;
use crate::Result;

/// Number of records returned by [`RecordStore::list_recent`] when the caller
/// does not choose a limit.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// A persisted reversal of one client address.
///
/// `reversed_ip` is always the octet reverse of `original_ip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    /// Store-assigned identifier.
    pub id: i32,
    /// Address as extracted from the request.
    pub original_ip: String,
    /// Octet-reversed address.
    pub reversed_ip: String,
    /// Store-assigned insertion time.
    pub created_at: Timestamp,
}

/// Storage backend for [`IpRecord`]s.
///
/// Every operation is independent: implementations acquire whatever resources
/// they need per call and release them before returning, on success and on
/// failure alike.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Ensures the backing schema exists.
    ///
    /// Idempotent; safe to call on every process start.
    async fn initialize(&self) -> Result<()>;

    /// Persists one record and returns it with its id and timestamp assigned.
    async fn store(&self, original_ip: &str, reversed_ip: &str) -> Result<IpRecord>;

    /// Returns at most `limit` records, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<IpRecord>>;

    /// Performs a trivial round trip to the backend.
    ///
    /// Never fails; an unreachable backend yields `false`.
    async fn health_check(&self) -> bool;

    /// Releases backend resources once the process stops serving.
    ///
    /// Later operations fail with a storage error.
    async fn close(&self) {}
}
