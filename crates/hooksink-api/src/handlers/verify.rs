//! Subscription-verification handshake handler.
//!
//! Delivery platforms confirm endpoint ownership by sending a challenge
//! token alongside a shared verification token; the gateway echoes the
//! challenge back verbatim on success. No stored state is mutated.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
};
use hooksink_core::SubscriberId;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{ApiError, AppState};

/// Expected value of `hub.mode` for a subscription handshake.
const SUBSCRIBE_MODE: &str = "subscribe";

/// Query parameters of the verification handshake.
///
/// All three are optional at the type level; validation decides the
/// response.
#[derive(Debug, Deserialize)]
pub struct HandshakeParams {
    /// Handshake mode; must be `subscribe`.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// Challenge token to echo back on success.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    /// Shared verification token.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

/// Handles `GET /{id}/events` verification handshakes.
///
/// The echo is byte-exact: the response body is the literal `hub.challenge`
/// value, unmodified.
///
/// # Errors
///
/// - 404 when the identifier is unknown
/// - 400 (empty body) when the handshake parameters fail validation
#[instrument(name = "verify_subscription", skip(state, params, headers, peer), fields(subscriber_id = %id))]
pub async fn verify_subscription(
    Path(id): Path<String>,
    Query(params): Query<HandshakeParams>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    let id = SubscriberId::from(id);

    if !state.storage.subscribers.exists(&id).await? {
        return Err(ApiError::NotFound);
    }

    // Behind a proxy the forwarded header carries the real client; when hit
    // directly the peer address of the connection is the caller.
    let peer_addr = peer.to_string();
    let caller = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&peer_addr);

    info!(
        mode = params.mode.as_deref().unwrap_or(""),
        challenge = params.challenge.as_deref().unwrap_or(""),
        verify_token = params.verify_token.as_deref().unwrap_or(""),
        caller,
        "verification handshake attempt"
    );

    let mode_ok = params.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_ok = params.verify_token.as_deref() == Some(state.config.verify_token.as_str());
    let challenge = params.challenge.as_deref().filter(|c| !c.is_empty());

    match (mode_ok, token_ok, challenge) {
        (true, true, Some(challenge)) => {
            info!(caller, "verification handshake success");
            Ok(challenge.to_string())
        },
        _ => {
            warn!(caller, "verification handshake failure");
            Err(ApiError::HandshakeRejected)
        },
    }
}
