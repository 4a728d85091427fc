//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the database and ensure the schema exists
//! - Build the template cache
//! - Assemble the shared application state and the HTTP server
//!
//! # Design Decisions
//! - Fail fast: a missing template or unreachable database aborts startup
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::http::{AppState, HttpServer};
use crate::models::{Database, StoreError};
use crate::templates::{TemplateCache, TemplateError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database initialization failed: {0}")]
    Database(#[from] StoreError),

    #[error("template cache initialization failed: {0}")]
    Templates(#[from] TemplateError),
}

/// Everything `main` needs once startup succeeded.
pub struct Bootstrapped {
    pub server: HttpServer,
    pub database: Database,
}

/// Build the application state and server from a validated configuration.
pub async fn bootstrap(config: AppConfig) -> Result<Bootstrapped, StartupError> {
    let database = Database::connect(&config.database).await?;
    let templates = TemplateCache::new(&config.templates.dir)?;

    let state = AppState {
        config: Arc::new(config),
        snippets: Arc::new(database.snippets()),
        users: Arc::new(database.users()),
        templates: Arc::new(templates),
    };

    tracing::info!("Subsystems initialized");
    Ok(Bootstrapped {
        server: HttpServer::new(state),
        database,
    })
}
