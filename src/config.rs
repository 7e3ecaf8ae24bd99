use crate::constants::{
    DEFAULT_COMMAND_LOG, DEFAULT_MAX_FILES, DEFAULT_MIN_FILES, DEFAULT_WELCOME_MESSAGE,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: SocketAddr,
    /// Address advertised in PASV replies, not necessarily the bind address.
    pub pasv_address: Ipv4Addr,
    pub pasv_bind_address: IpAddr,
    pub welcome_message: String,
    pub banner_file: Option<PathBuf>,
    pub command_log: PathBuf,
    pub payload_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VfsConfig {
    pub seed: Option<u64>,
    pub min_files: usize,
    pub max_files: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub vfs: VfsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 21)),
            pasv_address: Ipv4Addr::LOCALHOST,
            pasv_bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            welcome_message: String::from(DEFAULT_WELCOME_MESSAGE),
            banner_file: None,
            command_log: PathBuf::from(DEFAULT_COMMAND_LOG),
            payload_file: None,
        }
    }
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_files: DEFAULT_MIN_FILES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vfs.min_files > self.vfs.max_files {
            return Err(ConfigError::Invalid(format!(
                "vfs.min_files ({}) is greater than vfs.max_files ({})",
                self.vfs.min_files, self.vfs.max_files
            )));
        }
        if self.server.welcome_message.contains(['\r', '\n']) {
            return Err(ConfigError::Invalid(String::from(
                "server.welcome_message must be a single line, use banner_file for more",
            )));
        }
        Ok(())
    }
}
