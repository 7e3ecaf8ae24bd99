use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to open command log {0}: {1}")]
    Open(String, #[source] std::io::Error),

    #[error("Failed to encode command log entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to append to command log: {0}")]
    Write(#[from] std::io::Error),
}

/// One received command, as recorded before it is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLog {
    pub timestamp: String,
    pub ip: String,
    pub command: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub argument: String,
    pub cwd: String,
}

impl CommandLog {
    pub fn now(ip: &str, command: &str, argument: &str, cwd: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ip: ip.to_string(),
            command: command.to_string(),
            argument: argument.to_string(),
            cwd: cwd.to_string(),
        }
    }
}

/// Destination for command records. Recording is fire-and-forget: an
/// implementation reports its own failures and never fails the command.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &CommandLog);
}

/// Appends one JSON object per line to a file shared by all sessions.
///
/// Sessions only queue entries; a single writer task owns the file, so
/// appends are serialized and never block a session on disk I/O.
pub struct JsonlAuditLog {
    sender: mpsc::UnboundedSender<CommandLog>,
    writer: JoinHandle<()>,
}

impl JsonlAuditLog {
    /// Opens the file in append mode and starts the writer task. Must be
    /// called from within the tokio runtime.
    pub fn open(path: &Path) -> Result<Self, AuditError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AuditError::Open(path.display().to_string(), e))?;
        info!("Command log opened at {}", path.display());

        let (sender, receiver) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_entries(receiver, File::from_std(file)));
        Ok(Self { sender, writer })
    }

    /// Stops accepting entries and waits until every queued one is written.
    pub async fn close(self) {
        drop(self.sender);
        if let Err(e) = self.writer.await {
            warn!("Command log writer failed: {}", e);
        }
    }
}

async fn write_entries(mut receiver: mpsc::UnboundedReceiver<CommandLog>, mut file: File) {
    while let Some(entry) = receiver.recv().await {
        if let Err(e) = append(&mut file, &entry).await {
            warn!("[{}] Error recording command {}: {}", entry.ip, entry.command, e);
        }
    }
}

async fn append(file: &mut File, entry: &CommandLog) -> Result<(), AuditError> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, entry: &CommandLog) {
        if self.sender.send(entry.clone()).is_err() {
            warn!("[{}] Command log writer has stopped, dropping {}", entry.ip, entry.command);
        }
    }
}
