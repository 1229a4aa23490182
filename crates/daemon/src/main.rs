use std::path::PathBuf;

use clap::Parser;

use depot_daemon::ServiceConfig;

/// Quota-enforced user file storage with signed access links.
#[derive(Parser, Debug)]
#[command(name = "depot", version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the configured link-signing secret
    #[arg(long)]
    secret: Option<String>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if let Some(secret) = args.secret {
        config.links.secret = Some(secret.into());
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    depot_daemon::spawn_service(&config).await;

    Ok(())
}
