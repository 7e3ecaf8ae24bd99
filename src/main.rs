mod config;
mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod core_vfs;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env};
use log::warn;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format and colors
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();

    let mut config = load_config(args.config.as_deref())?;

    // Override the listen address from CLI if provided
    if let Some(listen) = args.listen {
        config.server.listen_address = listen;
    }

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}

/// Loads the configuration. A missing default file means built-in defaults;
/// a file named on the command line must exist.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration file: {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::load_from_file(Path::new(DEFAULT_CONFIG_PATH)).with_context(|| {
                format!("Failed to load configuration file: {}", DEFAULT_CONFIG_PATH)
            })?
        }
        None => {
            warn!("No configuration file at {}, using defaults", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };
    Ok(config)
}
