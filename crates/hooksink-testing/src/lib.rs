//! Test infrastructure for the hooksink gateway.
//!
//! Provides [`TestEnv`]: an in-memory SQLite database, the production
//! router, and helpers for driving requests through it without binding a
//! socket. Each environment owns its own database, so tests are fully
//! isolated from each other.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response, StatusCode},
    Router,
};
use hooksink_api::{create_router, AppState, Config};
use hooksink_core::Storage;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

/// Test environment wrapping the full request-handling surface.
pub struct TestEnv {
    pool: SqlitePool,
    /// Storage layer backed by this environment's database.
    pub storage: Arc<Storage>,
    /// Configuration the router was built with (default secrets and token).
    pub config: Arc<Config>,
    router: Router,
}

impl TestEnv {
    /// Creates a fresh environment with an empty in-memory database and
    /// default configuration (`TEST_VERIFY_TOKEN` / `superdupersecret`).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn new() -> Result<Self> {
        // A single connection keeps every handle on the same in-memory
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory database")?;

        Storage::migrate(&pool).await.context("run migrations")?;

        let state = AppState::new(Storage::new(pool.clone()), Config::default());
        let storage = state.storage.clone();
        let config = state.config.clone();
        // Stand-in for the connect info the production listener provides.
        let router = create_router(state)
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 41000))));

        Ok(Self { pool, storage, config, router })
    }

    /// Returns the underlying connection pool for direct fixture setup.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Sends a GET request to the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or dispatched; test-only code.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("host", "gateway.test")
            .body(Body::empty())
            .expect("build GET request");

        self.router.clone().oneshot(request).await.expect("dispatch GET request")
    }

    /// Sends a GET request with one extra header to the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or dispatched; test-only code.
    pub async fn get_with_header(&self, uri: &str, name: &str, value: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("host", "gateway.test")
            .header(name, value)
            .body(Body::empty())
            .expect("build GET request");

        self.router.clone().oneshot(request).await.expect("dispatch GET request")
    }

    /// Sends a POST request with a raw body to the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or dispatched; test-only code.
    pub async fn post(&self, uri: &str, body: impl Into<Body>) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("host", "gateway.test")
            .header("content-type", "application/json")
            .body(body.into())
            .expect("build POST request");

        self.router.clone().oneshot(request).await.expect("dispatch POST request")
    }

    /// Sends a POST request with a JSON value as the body.
    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> Response<Body> {
        self.post(uri, body.to_string()).await
    }

    /// Registers a new subscriber through the API and returns its
    /// identifier, extracted from the callback URL in the response body.
    ///
    /// # Panics
    ///
    /// Panics if registration fails or the response body is not in the
    /// expected shape.
    pub async fn register(&self) -> String {
        let response = self.get("/register").await;
        assert_eq!(response.status(), StatusCode::OK, "registration must succeed");

        let body = Self::body_text(response).await;
        let callback_line = body.lines().next().expect("registration body has a callback line");
        let callback_url = callback_line
            .rsplit(' ')
            .next()
            .expect("callback line ends with a URL");
        let base = callback_url.strip_suffix("/events").expect("callback URL ends with /events");

        base.rsplit('/').next().expect("base URL contains an id segment").to_string()
    }

    /// Reads a response body to completion as UTF-8 text.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read or is not valid UTF-8.
    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        String::from_utf8(bytes.to_vec()).expect("response body is UTF-8")
    }

    /// Reads a response body and parses it as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let text = Self::body_text(response).await;
        serde_json::from_str(&text).expect("response body is JSON")
    }
}
