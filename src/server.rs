use crate::config::Config;
use crate::constants::DEFAULT_PAYLOAD;
use crate::core_log::audit::{AuditSink, JsonlAuditLog};
use crate::core_network::network;
use crate::core_vfs::generator::VfsGenerator;
use crate::core_vfs::Vfs;
use crate::helpers::{load_banner, load_payload};
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;

/// Process-wide state shared read-only by every session.
pub struct ServerState {
    pub config: Config,
    pub vfs: Vfs,
    pub audit: Box<dyn AuditSink>,
    /// Extra `220-` lines sent before the welcome line.
    pub banner: Vec<String>,
    /// Bytes written for every RETR.
    pub payload: Vec<u8>,
}

impl ServerState {
    pub fn new(config: Config, vfs: Vfs, audit: Box<dyn AuditSink>) -> Self {
        Self {
            config,
            vfs,
            audit,
            banner: Vec::new(),
            payload: DEFAULT_PAYLOAD.as_bytes().to_vec(),
        }
    }

    /// Builds the virtual filesystem, opens the command log and loads the
    /// optional banner and payload files.
    pub fn initialize(config: Config) -> Result<Self> {
        let vfs = VfsGenerator::new(&config.vfs).build();
        let audit = JsonlAuditLog::open(&config.server.command_log)
            .context("Failed to initialize the command logger")?;

        let mut state = Self::new(config, vfs, Box::new(audit));
        if let Some(path) = &state.config.server.banner_file {
            state.banner = load_banner(path)?;
        }
        if let Some(path) = &state.config.server.payload_file {
            state.payload = load_payload(path)?;
        }
        Ok(state)
    }
}

/// Runs the FTP server until the listener fails.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let state = Arc::new(ServerState::initialize(config)?);

    match network::start_server(state).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to start server: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
