//! Snippetbox: a small server-rendered site for sharing text snippets.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ recover_panic → request id → log_request → secure_headers
//!                         │
//!                         ├── /static/*   file server
//!                         ├── /ping       liveness
//!                         └── pages       session → csrf → authenticate [→ require_authentication]
//!                                             │
//!                                             ▼
//!                                         handlers ──▶ models (SQLite)
//!                                             │
//!                                             ▼
//!                                         templates (cache built at startup)
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod templates;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use error::AppError;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
