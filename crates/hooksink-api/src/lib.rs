//! Hooksink HTTP API.
//!
//! Routes, handlers, configuration, and the API error type for the webhook
//! capture gateway. All persistent state lives behind
//! [`hooksink_core::Storage`]; handlers are stateless request processors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use hooksink_core::Storage;

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use error::ApiError;
pub use server::{create_router, start_server};

/// Shared application state injected into every handler.
///
/// Cheap to clone; both fields are behind `Arc`. The storage handle is the
/// only mutable resource in the system and is passed in explicitly rather
/// than held as module-level global state, so tests can substitute their
/// own pool.
#[derive(Clone)]
pub struct AppState {
    /// Storage layer owning all subscriber records.
    pub storage: Arc<Storage>,
    /// Service configuration (verification token, registration secret, ...).
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state from its parts.
    pub fn new(storage: Storage, config: Config) -> Self {
        Self { storage: Arc::new(storage), config: Arc::new(config) }
    }
}
