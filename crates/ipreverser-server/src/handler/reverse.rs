//! Reversal of the caller's address.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use ipreverser_core::reverse_ip;

use crate::extract::ClientIp;
use crate::handler::response::ReversalResponse;
use crate::handler::{Error, Result};
use crate::service::{RecordStoreRef, ServiceState};

/// Tracing target for reversal operations.
const TRACING_TARGET: &str = "ipreverser_server::handler::reverse";

/// Shown to the client whenever a reversal cannot be completed.
const FAILURE_MESSAGE: &str = "Failed to process IP address";

/// Reverses the caller's address, records it and echoes the result.
#[tracing::instrument(skip_all, fields(client_ip = %client_ip))]
async fn reverse_client_ip(
    State(store): State<RecordStoreRef>,
    client_ip: ClientIp,
) -> Result<Json<ReversalResponse>> {
    let reversed_ip = reverse_ip(client_ip.as_str()).map_err(failure)?;
    let record = store
        .store(client_ip.as_str(), &reversed_ip)
        .await
        .map_err(failure)?;

    tracing::info!(
        target: TRACING_TARGET,
        record_id = record.id,
        original_ip = %record.original_ip,
        reversed_ip = %record.reversed_ip,
        "IP address reversed"
    );

    Ok(Json(record.into()))
}

fn failure(error: ipreverser_core::Error) -> Error<'static> {
    Error::from(error).with_message(FAILURE_MESSAGE)
}

/// Returns a [`Router`] with the reversal route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/", get(reverse_client_ip))
}
