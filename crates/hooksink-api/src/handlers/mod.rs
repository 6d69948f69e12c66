//! HTTP request handlers for the hooksink API.
//!
//! Handlers follow a consistent pattern: resolve and validate the subscriber
//! identifier, act against storage, translate failures through [`ApiError`].
//! Each runs the fixed sequence existence check → action → response; no
//! handler holds state across requests.
//!
//! Handler organization:
//! - `register` — identifier issuance
//! - `verify` — subscription-verification handshake
//! - `ingest` — event ingestion
//! - `history` — rendered event history

use crate::ApiError;

pub mod history;
pub mod ingest;
pub mod register;
pub mod verify;

pub use history::events_history;
pub use ingest::ingest_event;
pub use register::register;
pub use verify::verify_subscription;

/// `GET /` placeholder.
///
/// The gateway has no landing page; real traffic goes to per-subscriber
/// paths.
pub async fn root() -> &'static str {
    "Nothing here"
}

/// Fallback for unmatched routes, including paths with a missing id segment.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
