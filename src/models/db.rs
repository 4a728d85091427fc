//! SQLite connection pool and schema.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::models::errors::StoreError;
use crate::models::snippets::SnippetModel;
use crate::models::users::UserModel;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS snippets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created INTEGER NOT NULL,
        expires INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_snippets_expires ON snippets (expires)",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        created INTEGER NOT NULL
    )",
];

/// Shared handle to the database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl Database {
    /// Open the pool and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.dsn)?.create_if_missing(true);

        // Every connection to an in-memory database is a separate database,
        // so keep exactly one alive for the lifetime of the pool.
        let in_memory = config.dsn.contains(":memory:") || config.dsn.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        let db = Self {
            pool,
            bcrypt_cost: config.bcrypt_cost,
        };
        db.migrate().await?;

        tracing::info!(dsn = %config.dsn, in_memory, "Database ready");
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn snippets(&self) -> SnippetModel {
        SnippetModel::new(self.pool.clone())
    }

    pub fn users(&self) -> UserModel {
        UserModel::new(self.pool.clone(), self.bcrypt_cost)
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
