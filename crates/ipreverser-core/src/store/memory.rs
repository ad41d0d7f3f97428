use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use super::{IpRecord, RecordStore};
use crate::{Error, Result, TRACING_TARGET_STORE};

/// In-process [`RecordStore`] keeping records in insertion order.
///
/// The store can be switched to an unavailable state with
/// [`set_available`](Self::set_available), after which every operation fails
/// with a storage error and [`health_check`](RecordStore::health_check)
/// reports `false`. This mirrors a lost database connection.
#[derive(Debug)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<IpRecord>>,
    next_id: AtomicI32,
    available: AtomicBool,
}

impl MemoryRecordStore {
    /// Creates an empty, available store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI32::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Marks the store as reachable or unreachable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns whether no records have been stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::storage().with_message("record store is unavailable"))
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn initialize(&self) -> Result<()> {
        self.ensure_available()
            .map_err(|e| Error::startup().with_source(e))?;
        tracing::debug!(target: TRACING_TARGET_STORE, "In-memory record store ready");
        Ok(())
    }

    async fn store(&self, original_ip: &str, reversed_ip: &str) -> Result<IpRecord> {
        self.ensure_available()?;

        let record = IpRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            original_ip: original_ip.to_owned(),
            reversed_ip: reversed_ip.to_owned(),
            created_at: Timestamp::now(),
        };

        self.records.write().await.push(record.clone());
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            record_id = record.id,
            original_ip = %record.original_ip,
            "Stored record"
        );

        Ok(record)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<IpRecord>> {
        self.ensure_available()?;

        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }

    async fn health_check(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_LIST_LIMIT, ErrorKind};

    #[tokio::test]
    async fn store_assigns_ids_and_timestamps() -> Result<()> {
        let store = MemoryRecordStore::new();
        store.initialize().await?;

        let before = Timestamp::now();
        let first = store.store("1.2.3.4", "4.3.2.1").await?;
        let second = store.store("8.8.8.8", "8.8.8.8").await?;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.original_ip, "1.2.3.4");
        assert_eq!(first.reversed_ip, "4.3.2.1");
        assert!(first.created_at >= before);
        assert_eq!(store.len().await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_recent_is_bounded_and_newest_first() -> Result<()> {
        let store = MemoryRecordStore::new();
        store.store("1.1.1.1", "1.1.1.1").await?;
        store.store("2.2.2.2", "2.2.2.2").await?;
        let newest = store.store("3.3.3.3", "3.3.3.3").await?;

        let recent = store.list_recent(2).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0], newest);
        assert_eq!(recent[1].original_ip, "2.2.2.2");

        let all = store.list_recent(DEFAULT_LIST_LIMIT).await?;
        assert_eq!(all.len(), 3);
        assert!(store.list_recent(0).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_fails_with_storage_error() {
        let store = MemoryRecordStore::new();
        store.set_available(false);

        let error = store.store("1.2.3.4", "4.3.2.1").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Storage);
        let error = store.list_recent(10).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Storage);
        let error = store.initialize().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Startup);

        assert!(!store.health_check().await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn health_check_follows_availability() {
        let store = MemoryRecordStore::default();
        assert!(store.health_check().await);
        store.set_available(false);
        assert!(!store.health_check().await);
        store.set_available(true);
        assert!(store.health_check().await);
    }

    #[test]
    fn record_serializes_with_snake_case_fields() -> anyhow::Result<()> {
        let record = IpRecord {
            id: 7,
            original_ip: "1.2.3.4".into(),
            reversed_ip: "4.3.2.1".into(),
            created_at: "2024-01-01T00:00:00Z".parse()?,
        };
        let json = serde_json::to_value(&record)?;
        assert_eq!(json["id"], 7);
        assert_eq!(json["original_ip"], "1.2.3.4");
        assert_eq!(json["reversed_ip"], "4.3.2.1");
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
        Ok(())
    }
}
