use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body returned to clients.
///
/// Carries only a short error title and an optional message. Internal detail
/// never reaches this type; it is logged where the error is converted.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse<'a> {
    /// Short error title
    pub error: Cow<'a, str>,
    /// Optional user-facing explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const INTERNAL_SERVER_ERROR: Self =
        Self::new("Internal server error", StatusCode::INTERNAL_SERVER_ERROR);
    pub const NOT_FOUND: Self = Self::new("Not found", StatusCode::NOT_FOUND);
    pub const REQUEST_TIMEOUT: Self = Self::new("Request timeout", StatusCode::REQUEST_TIMEOUT);

    /// Creates a new error response without a message.
    #[inline]
    pub const fn new(error: &'a str, status: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            message: None,
            status,
        }
    }

    /// Replaces the error title.
    pub fn with_error(mut self, error: impl Into<Cow<'a, str>>) -> Self {
        self.error = error.into();
        self
    }

    /// Sets the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_message() -> anyhow::Result<()> {
        let json = serde_json::to_value(ErrorResponse::NOT_FOUND)?;
        assert_eq!(json, serde_json::json!({ "error": "Not found" }));
        Ok(())
    }

    #[test]
    fn serializes_with_message() -> anyhow::Result<()> {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR.with_message("Failed to process IP address");
        let json = serde_json::to_value(&response)?;
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Internal server error",
                "message": "Failed to process IP address",
            })
        );
        Ok(())
    }

    #[test]
    fn status_is_kept_out_of_body() {
        let response = ErrorResponse::default().with_error("Failed to fetch records");
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
