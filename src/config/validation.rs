//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (addresses parse, sizes > 0, bcrypt cost in range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before the store or template cache is constructed

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Accepted bcrypt work factors.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every semantic constraint and collect all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.addr",
            format!("'{}' is not a socket address", config.server.addr),
        ));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be greater than 0"));
    }
    if config.database.dsn.trim().is_empty() {
        errors.push(ValidationError::new("database.dsn", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be greater than 0"));
    }
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&config.database.bcrypt_cost) {
        errors.push(ValidationError::new(
            "database.bcrypt_cost",
            format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        ));
    }
    if config.session.lifetime_hours <= 0 {
        errors.push(ValidationError::new("session.lifetime_hours", "must be greater than 0"));
    }
    if config.templates.dir.trim().is_empty() {
        errors.push(ValidationError::new("templates.dir", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
