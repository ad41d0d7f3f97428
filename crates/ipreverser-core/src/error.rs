//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while serving a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The IP address is missing or malformed.
    InvalidInput,
    /// The record store could not complete the operation.
    ///
    /// Covers connectivity loss, pool exhaustion and query failures.
    Storage,
    /// The record store could not be prepared during startup.
    Startup,
}

/// A structured error type for ipreverser operations.
#[derive(Debug, Error)]
#[error("{}{}", kind.as_ref(), message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new storage error.
    pub fn storage() -> Self {
        Self::new(ErrorKind::Storage)
    }

    /// Creates a new startup error.
    pub fn startup() -> Self {
        Self::new(ErrorKind::Startup)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the message attached to this error, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::invalid_input().with_message("IP address is required");
        assert_eq!(error.to_string(), "invalid_input: IP address is required");
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn display_without_message() {
        assert_eq!(Error::storage().to_string(), "storage");
        assert_eq!(Error::startup().kind_str(), "startup");
    }

    #[test]
    fn source_is_preserved() {
        let io = std::io::Error::other("connection refused");
        let error = Error::storage().with_source(io);
        assert!(error.source().is_some());
        assert!(error.message().is_none());
    }
}
