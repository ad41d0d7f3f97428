//! [`Error`], [`ErrorKind`] and [`Result`].

mod core_error;
mod http_error;

pub(crate) use core_error::error_chain;
pub use http_error::{Error, ErrorKind, Result};
