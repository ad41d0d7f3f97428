//! Database query repositories.

mod ip_record;

pub use ip_record::IpRecordRepository;
