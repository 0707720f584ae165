use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use warden::config::Config;
use warden::server;

#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about = "Minimal HTTP/1.1 file and echo server", long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to (e.g., 127.0.0.1:4221)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory served under /files/
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(args.log_level)
        .init();

    let mut cfg = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    if let Some(listen) = args.listen {
        cfg.server.listen_addr = listen;
    }
    if let Some(directory) = args.directory {
        cfg.files.directory = Some(directory);
    }

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
