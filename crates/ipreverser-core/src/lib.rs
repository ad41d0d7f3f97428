#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client IP extraction.
pub const TRACING_TARGET_EXTRACT: &str = "ipreverser_core::extract";

/// Tracing target for record store operations.
pub const TRACING_TARGET_STORE: &str = "ipreverser_core::store";

mod error;
pub mod extract;
pub mod reverse;
pub mod store;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use extract::{RequestInfo, RequestSource, extract_client_ip};
pub use reverse::{is_valid_ip, reverse_ip};
pub use store::{DEFAULT_LIST_LIMIT, IpRecord, MemoryRecordStore, RecordStore};
