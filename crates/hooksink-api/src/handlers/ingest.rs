//! Event ingestion handler: appends inbound deliveries to a subscriber's
//! history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use bytes::Bytes;
use hooksink_core::SubscriberId;
use tracing::{info, instrument, warn};

use crate::{ApiError, AppState};

/// Handles `POST /{id}/events`.
///
/// Accepts an arbitrary JSON document, re-serializes it compactly, and
/// appends the text atomically to the subscriber's stored list. The store
/// does not validate any schema; the only invariant enforced here is that
/// the body parses as JSON.
///
/// Ingestion never creates subscribers: an identifier exists only if
/// registration produced it, and a registered subscriber with an empty
/// event list is present, not absent.
///
/// # Errors
///
/// - 404 when the identifier is unknown
/// - 400 when the body is not valid JSON
/// - 500 when the store is unavailable
#[instrument(name = "ingest_event", skip(state, body), fields(subscriber_id = %id, payload_size = body.len()))]
pub async fn ingest_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = SubscriberId::from(id);

    if !state.storage.subscribers.exists(&id).await? {
        return Err(ApiError::NotFound);
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting malformed payload");
        ApiError::MalformedPayload(e.to_string())
    })?;

    let serialized = payload.to_string();
    state.storage.subscribers.append_event(&id, &serialized).await?;

    info!(event_len = serialized.len(), "event ingested");
    Ok(StatusCode::OK)
}
