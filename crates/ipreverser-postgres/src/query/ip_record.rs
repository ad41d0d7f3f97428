//! Reversal record repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{IpRecord, NewIpRecord};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for reversal record database operations.
///
/// Records are create-only; there are no update or delete operations.
pub trait IpRecordRepository {
    /// Inserts a record and returns it with its id and timestamp.
    fn create_ip_record(
        &mut self,
        new_record: NewIpRecord,
    ) -> impl Future<Output = PgResult<IpRecord>> + Send;

    /// Lists at most `limit` records, newest first.
    ///
    /// Records sharing a timestamp are ordered by descending id.
    fn list_recent_ip_records(
        &mut self,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<IpRecord>>> + Send;
}

impl IpRecordRepository for PgConnection {
    async fn create_ip_record(&mut self, new_record: NewIpRecord) -> PgResult<IpRecord> {
        use schema::ip_records;

        let record = diesel::insert_into(ip_records::table)
            .values(&new_record)
            .returning(IpRecord::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            record_id = record.id,
            "Inserted ip record"
        );

        Ok(record)
    }

    async fn list_recent_ip_records(&mut self, limit: i64) -> PgResult<Vec<IpRecord>> {
        use schema::ip_records::{self, dsl};

        ip_records::table
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(limit)
            .select(IpRecord::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
