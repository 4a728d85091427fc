//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the snippet server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and request handling settings.
    pub server: ServerConfig,

    /// Persistence settings.
    pub database: DatabaseConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Template cache settings.
    pub templates: TemplateConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:4000").
    pub addr: String,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Largest request body accepted on state-changing routes, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:4000".to_string(),
            static_dir: "./ui/static".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection string (e.g., "sqlite://snippetbox.db").
    pub dsn: String,

    /// Maximum pooled connections. In-memory databases always use one.
    pub max_connections: u32,

    /// bcrypt work factor for stored passwords.
    pub bcrypt_cost: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://snippetbox.db".to_string(),
            max_connections: 5,
            bcrypt_cost: 12,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window after which a session expires, in hours.
    pub lifetime_hours: i64,

    /// Mark the session cookie `Secure`. Only disable for plain-HTTP development.
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_hours: 12,
            secure_cookie: true,
        }
    }
}

/// Template cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `base.tmpl`, `partials/` and `pages/`.
    pub dir: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: "./ui/html".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
