//! Core domain types and storage for the hooksink webhook gateway.
//!
//! Provides the subscriber identifier primitive, the error taxonomy, and
//! the SQLite-backed storage layer that owns all persistent state. The API
//! crate depends on these types; nothing here knows about HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use models::SubscriberId;
pub use storage::Storage;
