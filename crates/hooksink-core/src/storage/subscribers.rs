//! Repository for subscriber records and their event lists.
//!
//! A subscriber row is created once at registration and only ever mutated by
//! appending events. The event list is stored as a JSON array of strings,
//! each element being one raw serialized payload in arrival order.
//!
//! Presence is always an explicit `Option`: an empty event list is a present
//! subscriber, never conflated with an unknown identifier.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    error::{CoreError, Result},
    models::SubscriberId,
};

/// Repository for subscriber database operations.
pub struct Repository {
    pool: Arc<SqlitePool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<SqlitePool> {
        self.pool.clone()
    }

    /// Creates a subscriber record with an empty event list.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConstraintViolation` if the identifier already
    /// exists, which should never happen for freshly issued ids.
    pub async fn create(&self, id: &SubscriberId) -> Result<()> {
        sqlx::query("INSERT INTO subscribers (id, events) VALUES (?1, '[]')")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await?;

        debug!(subscriber_id = %id, "subscriber created");
        Ok(())
    }

    /// Returns whether a subscriber identifier is known.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the query fails.
    pub async fn exists(&self, id: &SubscriberId) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM subscribers WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Reads the full ordered event list for a subscriber.
    ///
    /// Returns `None` if and only if the identifier is unknown. A registered
    /// subscriber with no events yet yields `Some(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CorruptValue` if the stored list cannot be
    /// decoded, `CoreError::Database` on query failure.
    pub async fn events(&self, id: &SubscriberId) -> Result<Option<Vec<String>>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT events FROM subscribers WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some((raw,)) => {
                let events: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
                    CoreError::CorruptValue(format!("event list for {id} is not a string array: {e}"))
                })?;
                Ok(Some(events))
            },
            None => Ok(None),
        }
    }

    /// Replaces the full event list for a subscriber.
    ///
    /// Whole-value write matching the key-value contract. `append_event` is
    /// the right call for the ingestion path; this exists for administrative
    /// use and tests.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the identifier is unknown.
    pub async fn replace_events(&self, id: &SubscriberId, events: &[String]) -> Result<()> {
        let raw = serde_json::to_string(events)
            .map_err(|e| CoreError::CorruptValue(format!("unserializable event list: {e}")))?;

        let result = sqlx::query("UPDATE subscribers SET events = ?1 WHERE id = ?2")
            .bind(raw)
            .bind(id.as_str())
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("subscriber {id}")));
        }

        Ok(())
    }

    /// Appends one serialized event to the end of a subscriber's list.
    ///
    /// Runs as a single UPDATE using `json_insert` with the array-append
    /// path, so the read-modify-write happens inside the database and two
    /// concurrent appends to the same identifier both land. This is the
    /// serialization point for concurrent deliveries; no in-process locking
    /// is needed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the identifier is unknown.
    pub async fn append_event(&self, id: &SubscriberId, event: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE subscribers SET events = json_insert(events, '$[#]', ?1) WHERE id = ?2")
                .bind(event)
                .bind(id.as_str())
                .execute(&*self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("subscriber {id}")));
        }

        debug!(subscriber_id = %id, event_len = event.len(), "event appended");
        Ok(())
    }
}
