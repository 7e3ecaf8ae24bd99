use crate::core_vfs::FsNode;
use crate::helpers::{send_data, send_response};
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Formats one `ls -l` style line. Directories always report size 0.
pub fn format_list_entry(node: &FsNode) -> String {
    let mode = if node.is_dir() { "drwxr-xr-x" } else { "-rw-r--r--" };
    format!(
        "{} 1 ftp ftp {:>12} Jan 01 00:00 {}\r\n",
        mode,
        node.size(),
        node.name()
    )
}

/// Builds the listing of a directory, children in their stored order.
pub fn format_listing(dir: &FsNode) -> String {
    dir.children().iter().map(format_list_entry).collect()
}

/// Handles the LIST FTP command.
///
/// The data connection is obtained first; without one nothing else happens.
/// The listing is always of the current directory, whatever the argument.
pub async fn handle_list_command<W>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut data_stream = match session.data_channel.obtain_connection().await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("{} LIST failed: {}", session.log_prefix, e);
            return send_response(writer, e.to_ftp_response().as_bytes()).await;
        }
    };

    send_response(writer, b"150 Opening data connection for directory list.\r\n").await?;

    let listing = match state.vfs.resolve(&session.current_dir) {
        Some(node) if node.is_dir() => format_listing(node),
        _ => {
            drop(data_stream);
            return send_response(writer, b"550 Not a directory.\r\n").await;
        }
    };

    if let Err(e) = send_data(&mut data_stream, listing.as_bytes()).await {
        warn!("{} Failed to send directory listing: {}", session.log_prefix, e);
        return send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await;
    }
    drop(data_stream);

    info!("{} Listed {}", session.log_prefix, session.current_dir);
    send_response(writer, b"226 Directory send OK.\r\n").await
}
