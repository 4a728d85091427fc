use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use snippetbox::config::{read_config, validate_config, AppConfig, ConfigError};
use snippetbox::lifecycle::{bootstrap, wait_for_termination, Shutdown};
use snippetbox::observability::logging;

#[derive(Debug, Parser)]
#[command(name = "snippetbox", version, about = "Share and view text snippets")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP network address (overrides the config file)
    #[arg(long)]
    addr: Option<String>,

    /// Database DSN (overrides the config file)
    #[arg(long)]
    dsn: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(addr) = &cli.addr {
        config.server.addr = addr.clone();
    }
    if let Some(dsn) = &cli.dsn {
        config.database.dsn = dsn.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&config.observability);
    tracing::info!("snippetbox v{} starting", env!("CARGO_PKG_VERSION"));

    let addr = config.server.addr.clone();
    let app = bootstrap(config).await?;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    let result = app.server.run(listener, receiver).await;
    app.database.close().await;

    result?;
    tracing::info!("Shutdown complete");
    Ok(())
}
