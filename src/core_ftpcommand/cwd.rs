use crate::core_vfs::path::resolve_argument;
use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the CWD FTP command.
///
/// The target is cleaned and looked up in the virtual filesystem. The current
/// directory only changes when the target is an existing directory.
pub async fn handle_cwd_command<W>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let new_dir = resolve_argument(&session.current_dir, arg);

    match state.vfs.resolve(&new_dir) {
        Some(node) if node.is_dir() => {
            session.current_dir = new_dir;
            info!("{} Changed directory to {}", session.log_prefix, session.current_dir);
            send_response(writer, b"250 Directory successfully changed.\r\n").await
        }
        _ => {
            warn!("{} Failed to change directory to: {}", session.log_prefix, new_dir);
            send_response(writer, b"550 Failed to change directory.\r\n").await
        }
    }
}
