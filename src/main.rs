//! geminid: a Gemini protocol server.
//!
//! Loads configuration, builds the TLS identity, optionally indexes a
//! content directory into the route table, and serves until
//! interrupted.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geminid::config::{loader, ServerConfig};
use geminid::handlers::index_directory;
use geminid::{Server, ServerError};

#[derive(Parser, Debug)]
#[command(name = "geminid", about = "Gemini protocol server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geminid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.listener.host = host;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    tracing::info!(
        address = %config.listener.address(),
        max_connections = config.listener.max_connections,
        cert = %config.tls.cert_path,
        "Configuration loaded"
    );

    let server = Server::new(config)?;

    if server.config().content.enabled {
        let root = PathBuf::from(&server.config().content.root);
        let count = index_directory(server.router(), &root)
            .await
            .map_err(ServerError::Index)?;
        tracing::info!(root = %root.display(), routes = count, "Content indexed");
    }

    server.listen().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
