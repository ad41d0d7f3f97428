//! Database models for PostgreSQL tables.

mod ip_record;

pub use ip_record::{IpRecord, NewIpRecord};
