//! Conversion of domain errors into HTTP errors.

use std::error::Error as StdError;
use std::fmt::Write;

use ipreverser_core::Error as CoreError;

use crate::handler::{Error, ErrorKind};

/// Renders an error and all of its sources as `outer: inner: root`.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(chain, ": {cause}");
        source = cause.source();
    }
    chain
}

/// Every domain failure becomes an opaque 500; the full chain goes to the log
/// through the error context.
impl From<CoreError> for Error<'static> {
    fn from(error: CoreError) -> Self {
        ErrorKind::InternalServerError.with_context(error_chain(&error))
    }
}
