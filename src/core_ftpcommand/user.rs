use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the USER FTP command.
///
/// Any username is accepted; the attempt is only logged.
///
/// # Arguments
///
/// * `writer` - The control connection to reply on.
/// * `_state` - Shared server state (not used in this command).
/// * `session` - The session the command arrived on.
/// * `username` - The username provided by the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_user_command<W>(
    writer: &mut W,
    _state: &ServerState,
    session: &mut Session,
    username: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("{} Login attempt: USER {}", session.log_prefix, username);
    send_response(writer, b"331 Username OK, need password.\r\n").await
}
