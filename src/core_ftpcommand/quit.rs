use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info};
use tokio::io::AsyncWrite;

/// Handles the QUIT FTP command.
///
/// Replies goodbye and moves the session to its terminal state; the command
/// loop stops reading once it sees the session closed.
///
/// # Arguments
///
/// * `writer` - The control connection to reply on.
/// * `session` - The session to close.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_quit_command<W>(writer: &mut W, session: &mut Session) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    session.close();

    if let Err(e) = send_response(writer, b"221 Goodbye.\r\n").await {
        error!("{} Failed to send QUIT response: {}", session.log_prefix, e);
        return Err(e);
    }

    info!("{} Connection closed by client.", session.log_prefix);
    Ok(())
}
