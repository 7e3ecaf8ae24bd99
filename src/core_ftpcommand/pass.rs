use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the PASS FTP command. Every password is accepted.
pub async fn handle_pass_command<W>(
    writer: &mut W,
    _state: &ServerState,
    session: &mut Session,
    _password: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("{} User logged in", session.log_prefix);
    send_response(writer, b"230 Login successful.\r\n").await
}
