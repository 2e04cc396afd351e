//! Rolegate gateway binary.

use anyhow::Result;
use clap::Parser;
use rolegate_server::{
    config::{load_config, validate_config},
    logging, Server,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rolegate-server", version, about = "Role-based route guard gateway")]
struct Args {
    /// Configuration file layered over the built-in defaults.
    #[arg(short, long, env = "ROLEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("config error: {error}");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    logging::init(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rules = config.rules.len(),
        "Starting Rolegate gateway"
    );

    let server = Server::new(&config)?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
