//! Store error definitions.

use thiserror::Error;

/// Errors returned by the snippet and user stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live record matched the query.
    #[error("no matching record found")]
    NotFound,

    /// A user with this email address already exists.
    #[error("duplicate email")]
    DuplicateEmail,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The requested lifetime does not fit in a timestamp.
    #[error("invalid snippet lifetime: {0} days")]
    InvalidLifetime(i64),

    /// A stored timestamp could not be decoded.
    #[error("invalid stored timestamp: {0}")]
    Timestamp(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
