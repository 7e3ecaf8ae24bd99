use crate::core_vfs::path::join_relative;
use crate::helpers::{send_data, send_response};
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the RETR (Retrieve) FTP command.
///
/// The path is checked against the virtual filesystem before any data
/// connection is touched. The bytes sent are always the configured payload;
/// the declared size of the file plays no part.
///
/// # Arguments
///
/// * `writer` - The control connection to reply on.
/// * `state` - Shared server state holding the filesystem and payload.
/// * `session` - The session the command arrived on.
/// * `arg` - The file to retrieve, always taken relative to the current directory.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command<W>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let target = join_relative(&session.current_dir, arg);
    match state.vfs.resolve(&target) {
        Some(node) if !node.is_dir() => {}
        _ => {
            info!("{} RETR failed. Path {} not found.", session.log_prefix, target);
            return send_response(writer, b"550 File not found.\r\n").await;
        }
    }

    let mut data_stream = match session.data_channel.obtain_connection().await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("{} RETR failed: {}", session.log_prefix, e);
            return send_response(writer, e.to_ftp_response().as_bytes()).await;
        }
    };

    send_response(writer, b"150 Opening data connection for file transfer.\r\n").await?;

    if let Err(e) = send_data(&mut data_stream, &state.payload).await {
        warn!("{} Failed to send {}: {}", session.log_prefix, target, e);
        return send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await;
    }
    drop(data_stream);

    info!("{} Sent {} ({} bytes)", session.log_prefix, target, state.payload.len());
    send_response(writer, b"226 Transfer complete.\r\n").await
}
