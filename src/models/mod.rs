//! Persistence boundary.
//!
//! # Data Flow
//! ```text
//! handlers / middleware
//!     → SnippetStore / UserStore (object-safe traits)
//!     → db.rs (SQLite pool, schema)
//!     → snippets.rs / users.rs (queries)
//! ```
//!
//! # Design Decisions
//! - Expiry filtering happens in SQL; callers never see an expired snippet
//! - "No matching row" is `StoreError::NotFound`, never a raw database error
//! - Timestamps are stored as UTC unix milliseconds

pub mod db;
pub mod errors;
pub mod snippets;
pub mod users;

pub use db::Database;
pub use errors::StoreError;
pub use snippets::{Snippet, SnippetModel, SnippetStore, LATEST_LIMIT};
pub use users::{UserModel, UserStore};
