//! Registration handler: mints subscriber identifiers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
};
use hooksink_core::SubscriberId;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{ApiError, AppState};

/// Query parameters accepted by `GET /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    /// Optional shared secret. When present and non-empty it must match the
    /// configured registration secret (case-insensitively). When absent or
    /// empty the request is authorized — a deliberately preserved
    /// permissive policy.
    pub key: Option<String>,
}

/// Registers a new subscriber.
///
/// Issues a fresh identifier, initializes an empty event list in the store,
/// and returns the callback and history URLs constructed from the request's
/// Host header.
///
/// # Errors
///
/// - 401 when `key` is present but does not match the configured secret
/// - 500 when the store is unavailable
#[instrument(name = "register", skip(state, params, headers))]
pub async fn register(
    Query(params): Query<RegisterParams>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    // An empty key counts as absent; only a non-empty mismatching key is
    // rejected.
    if let Some(key) = params.key.as_deref().filter(|k| !k.is_empty()) {
        if !key.eq_ignore_ascii_case(&state.config.register_secret) {
            warn!("registration rejected: secret mismatch");
            return Err(ApiError::Unauthorized);
        }
    }

    let id = SubscriberId::issue();
    state.storage.subscribers.create(&id).await?;

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    let base_url = format!("{}://{}/{}", state.config.public_scheme, host, id);
    let callback_url = format!("{base_url}/events");
    let events_history_url = format!("{base_url}/events_history");

    info!(subscriber_id = %id, host, "subscriber registered");

    Ok(format!(
        "Register Webhooks at Callback URL: {callback_url}\nView Webhook Events at URL: {events_history_url}"
    ))
}
