//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust
//! use ipreverser_core::MemoryRecordStore;
//! use ipreverser_server::handler::routes;
//! use ipreverser_server::service::ServiceState;
//!
//! let state = ServiceState::with_store(MemoryRecordStore::new());
//! let router: axum::Router = routes().with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod records;
mod response;
mod reverse;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub(crate) use crate::handler::error::error_chain;
pub use crate::handler::response::{
    ErrorResponse, HealthResponse, HealthStatus, ReversalResponse, StoreHealthResponse,
};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and a JSON `404` fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(reverse::routes())
        .merge(records::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum_test::TestServer;
    use ipreverser_core::MemoryRecordStore;

    use crate::handler::routes;
    use crate::service::ServiceState;

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let server = TestServer::new(router.with_state(state))?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with all routes over the given store.
    pub fn create_test_server_with_store(store: MemoryRecordStore) -> anyhow::Result<TestServer> {
        create_test_server_with_state(routes(), ServiceState::with_store(store))
    }

    /// Returns a new [`TestServer`] with all routes over an empty store.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_store(MemoryRecordStore::new())
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/nope").await;
        response.assert_status_not_found();
        response.assert_json(&serde_json::json!({ "error": "Not found" }));
        Ok(())
    }
}
