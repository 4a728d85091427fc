//! Snippet records and their store.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::models::errors::StoreError;

/// Number of snippets shown on the home page.
pub const LATEST_LIMIT: u32 = 10;

/// A short-lived text record. Visible only while `expires > now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// Persistence operations on snippets. Every read filters out expired records.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Store a new snippet living for `lifetime_days` from now and return its id.
    async fn insert(
        &self,
        title: &str,
        content: &str,
        lifetime_days: i64,
    ) -> Result<i64, StoreError>;

    /// Fetch a live snippet, or `StoreError::NotFound`.
    async fn get(&self, id: i64) -> Result<Snippet, StoreError>;

    /// Up to `limit` live snippets, newest id first.
    async fn latest(&self, limit: u32) -> Result<Vec<Snippet>, StoreError>;
}

/// SQLite-backed snippet store.
#[derive(Debug, Clone)]
pub struct SnippetModel {
    pool: SqlitePool,
}

impl SnippetModel {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnippetStore for SnippetModel {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        lifetime_days: i64,
    ) -> Result<i64, StoreError> {
        let created = Utc::now();
        let expires = TimeDelta::try_days(lifetime_days)
            .and_then(|lifetime| created.checked_add_signed(lifetime))
            .ok_or(StoreError::InvalidLifetime(lifetime_days))?;

        let result = sqlx::query(
            "INSERT INTO snippets (title, content, created, expires) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(created.timestamp_millis())
        .bind(expires.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Snippet, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? AND id = ?",
        )
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => snippet_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn latest(&self, limit: u32) -> Result<Vec<Snippet>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? ORDER BY id DESC LIMIT ?",
        )
        .bind(Utc::now().timestamp_millis())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(snippet_from_row).collect()
    }
}

fn snippet_from_row(row: &SqliteRow) -> Result<Snippet, StoreError> {
    Ok(Snippet {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created: from_millis(row.try_get::<i64, _>("created")?)?,
        expires: from_millis(row.try_get::<i64, _>("expires")?)?,
    })
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or(StoreError::Timestamp(millis))
}
