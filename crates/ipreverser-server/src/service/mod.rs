//! Application state and dependency injection.

mod config;
mod pg_store;
mod state;

pub use ipreverser_core::{Error, Result};

pub use crate::service::config::ServiceConfig;
pub use crate::service::pg_store::PgRecordStore;
pub use crate::service::state::{RecordStoreRef, ServiceState};

/// Tracing target for service lifecycle events.
pub(crate) const TRACING_TARGET: &str = "ipreverser_server::service";
