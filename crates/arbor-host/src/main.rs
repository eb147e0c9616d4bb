//! Arbor host - serves the viewer page, its wasm bundle and the plant models

mod config;
mod server;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Static host for the Arbor plant viewer")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "arbor.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Arbor host v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    if !config.server.web_dir.join("index.html").is_file() {
        warn!(web_dir = %config.server.web_dir.display(), "No index.html in web directory");
    }
    for path in config.missing_assets() {
        warn!(path = %path, "Model referenced by the viewer is missing");
    }

    server::run(&config).await
}
