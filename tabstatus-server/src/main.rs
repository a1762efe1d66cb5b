use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use tabstatus_common::models::StatusConfig;

mod commands;
mod context;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "tabstatus")]
#[command(author, version, about = "tabstatus - per-participant status tags with a console front end")]
pub struct Args {
    /// Directory holding config.yml and statuses.yml
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Config file (default: <data-dir>/config.yml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Status document (default: <data-dir>/statuses.yml)
    #[arg(long)]
    pub statuses: Option<PathBuf>,

    /// Seconds between display name refreshes
    #[arg(long, default_value_t = 30)]
    pub refresh_secs: u64,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.data_dir.join("config.yml"))
    }

    pub fn statuses_path(&self) -> PathBuf {
        self.statuses
            .clone()
            .unwrap_or_else(|| self.data_dir.join("statuses.yml"))
    }
}

/// `loggerLevel` from the config file, read before anything else so the
/// subscriber is up while the config manager loads. Falls back to "info".
fn configured_log_level(args: &Args) -> String {
    std::fs::read_to_string(args.config_path())
        .ok()
        .and_then(|text| serde_yaml::from_str::<StatusConfig>(&text).ok())
        .map(|cfg| cfg.logger_level)
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&configured_log_level(&args));
    info!(
        "tabstatus starting. config={}, statuses={}",
        args.config_path().display(),
        args.statuses_path().display()
    );

    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e).context("tabstatus server failed");
    }
    info!("Main finished. Goodbye!");
    Ok(())
}
