//! Domain primitives for the webhook gateway.
//!
//! The only persistent entity is the subscriber record: an opaque identifier
//! paired with an ordered list of raw JSON event payloads. The identifier is
//! the newtype below; the event list lives entirely in the storage layer as
//! `Vec<String>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one registered webhook endpoint.
///
/// Issued once at registration and never reused. The string form is
/// URL-safe (a hyphen-free UUID v4), so it can be embedded directly in
/// callback and history URLs. Collisions are treated as practically
/// impossible; no uniqueness re-check is performed against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Issues a new random subscriber identifier.
    pub fn issue() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubscriberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubscriberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
