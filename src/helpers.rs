use anyhow::{Context, Result};
use log::{error, info};
use std::fs;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends a reply line to the client and flushes it straight away.
pub async fn send_response<W>(writer: &mut W, message: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(message).await?;
    writer.flush().await
}

/// Writes a whole transfer over a data connection and closes our side of it.
pub async fn send_data<W>(stream: &mut W, data: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(data).await?;
    stream.shutdown().await
}

/// Reads a banner file, one `220-` line per line of text.
pub fn load_banner(path: &Path) -> Result<Vec<String>> {
    let banner = fs::read_to_string(path)
        .map_err(|e| {
            error!("Failed to read banner file: {}: {}", path.display(), e);
            anyhow::Error::new(e)
        })
        .with_context(|| format!("Failed to read banner file: {}", path.display()))?;

    if banner.trim().is_empty() {
        error!("Banner file is empty: {}", path.display());
        return Err(anyhow::Error::msg("Banner file is empty."));
    }

    info!("Banner file loaded successfully: {}", path.display());
    Ok(banner.lines().map(|line| line.trim_end().to_string()).collect())
}

/// Reads the bytes served for every RETR.
pub fn load_payload(path: &Path) -> Result<Vec<u8>> {
    let payload = fs::read(path)
        .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
    info!(
        "Payload file loaded successfully: {} ({} bytes)",
        path.display(),
        payload.len()
    );
    Ok(payload)
}
