//! User accounts. Passwords are bcrypt-hashed on a blocking thread.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::models::errors::StoreError;

/// Account operations used by the signup/login handlers and the auth middleware.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account and return its id. Fails with `DuplicateEmail` if taken.
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, StoreError>;

    /// Check credentials and return the user id, or `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, StoreError>;

    /// Whether an account with this id exists.
    async fn exists(&self, id: i64) -> Result<bool, StoreError>;
}

/// SQLite-backed user store.
#[derive(Debug, Clone)]
pub struct UserModel {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl UserModel {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }
}

#[async_trait]
impl UserStore for UserModel {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, StoreError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let result = sqlx::query(
            "INSERT INTO users (name, email, hashed_password, created) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(hashed)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT id, hashed_password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(StoreError::InvalidCredentials);
        };
        let id: i64 = row.try_get("id")?;
        let hashed: String = row.try_get("hashed_password")?;

        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await??;

        if matches {
            Ok(id)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?) AS found")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        let found: i64 = row.try_get("found")?;
        Ok(found != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::Database;

    async fn store() -> UserModel {
        let config = DatabaseConfig {
            dsn: "sqlite::memory:".into(),
            max_connections: 1,
            bcrypt_cost: crate::config::validation::MIN_BCRYPT_COST,
        };
        Database::connect(&config).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_insert_and_authenticate() {
        let users = store().await;
        let id = users.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();

        assert_eq!(users.authenticate("alice@example.com", "pa$$word").await.unwrap(), id);
        assert!(users.exists(id).await.unwrap());
        assert!(!users.exists(id + 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let users = store().await;
        users.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();
        let err = users.insert("Other", "alice@example.com", "different").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let users = store().await;
        users.insert("Alice", "alice@example.com", "pa$$word").await.unwrap();

        assert!(matches!(
            users.authenticate("alice@example.com", "wrong").await,
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            users.authenticate("bob@example.com", "pa$$word").await,
            Err(StoreError::InvalidCredentials)
        ));
    }
}
