//! Storage layer implementing the repository pattern over SQLite.
//!
//! SQLite plays the role of the durable key-value mapping: one row per
//! subscriber, value = the full ordered event list. All database access goes
//! through the repository; handlers never run SQL directly.

use std::sync::Arc;

use sqlx::SqlitePool;

pub mod subscribers;

use crate::error::Result;

/// Container for repository instances providing unified database access.
#[derive(Clone)]
pub struct Storage {
    /// Repository for subscriber records and their event lists.
    pub subscribers: Arc<subscribers::Repository>,
}

impl Storage {
    /// Creates a new storage instance with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        let pool = Arc::new(pool);
        Self { subscribers: Arc::new(subscribers::Repository::new(pool)) }
    }

    /// Ensures the schema exists.
    ///
    /// The schema is a single table mapping a subscriber id to the JSON
    /// serialization of its ordered event list.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the DDL statement fails.
    pub async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscribers (
                id TEXT PRIMARY KEY,
                events TEXT NOT NULL DEFAULT '[]'
            )
            ",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Performs a health check on the database connection.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the connection is unhealthy.
    pub async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&*self.subscribers.pool()).await?;

        Ok(())
    }
}
