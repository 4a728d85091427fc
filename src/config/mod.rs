//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! snippetbox.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (--addr, --dsn)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with the request pipeline
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup, before the store and template cache exist
//! - All fields have defaults so an empty (or absent) file is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, ConfigError};
pub use schema::{
    AppConfig, DatabaseConfig, ObservabilityConfig, ServerConfig, SessionConfig, TemplateConfig,
};
pub use validation::{validate_config, ValidationError};
