//! Reversal record model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::ip_records;

/// A stored reversal of one client address.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = ip_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IpRecord {
    /// Auto-incremented identifier.
    pub id: i32,
    /// Address as extracted from the request.
    pub original_ip: String,
    /// Octet-reversed address.
    pub reversed_ip: String,
    /// Insertion time, assigned by the database.
    pub created_at: Timestamp,
}

/// Data for creating a new reversal record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ip_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewIpRecord {
    /// Address as extracted from the request.
    pub original_ip: String,
    /// Octet-reversed address.
    pub reversed_ip: String,
}

impl NewIpRecord {
    /// Creates insert data for an address and its reversal.
    pub fn new(original_ip: impl Into<String>, reversed_ip: impl Into<String>) -> Self {
        Self {
            original_ip: original_ip.into(),
            reversed_ip: reversed_ip.into(),
        }
    }
}
