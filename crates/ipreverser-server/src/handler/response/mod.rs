//! Response types for HTTP handlers.

mod error_response;
mod monitors;
mod reversal;

pub use error_response::ErrorResponse;
pub use monitors::{HealthResponse, HealthStatus, StoreHealthResponse};
pub use reversal::ReversalResponse;
