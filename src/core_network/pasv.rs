use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use log::{debug, warn};
use std::net::Ipv4Addr;
use tokio::io::AsyncWrite;

/// Formats the classic 227 reply: advertised address octets, then the port
/// as high and low bytes.
pub fn format_pasv_response(pasv_ip: Ipv4Addr, port: u16) -> String {
    let [a1, a2, a3, a4] = pasv_ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).\r\n",
        a1,
        a2,
        a3,
        a4,
        port / 256,
        port % 256
    )
}

/// Formats the extended 229 reply, which only carries the port.
pub fn format_epsv_response(port: u16) -> String {
    format!("229 Entering Extended Passive Mode (|||{}|)\r\n", port)
}

/// Handles the PASV command.
///
/// Any pending data channel is closed, a fresh listener is bound on an
/// ephemeral port and its port is advertised along with the configured
/// public address.
pub async fn handle_pasv_command<W>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let pasv_ip = state.config.server.pasv_address;
    open_passive_and_reply(writer, state, session, |port| {
        format_pasv_response(pasv_ip, port)
    })
    .await
}

/// Handles the EPSV command. Same listener as PASV, port-only reply.
pub async fn handle_epsv_command<W>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    open_passive_and_reply(writer, state, session, format_epsv_response).await
}

/// Binds the passive listener and answers with `format_response(port)`, or
/// with 425 when the bind fails. A failed bind leaves nothing pending.
async fn open_passive_and_reply<W, F>(
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    format_response: F,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
    F: FnOnce(u16) -> String,
{
    let bind_ip = state.config.server.pasv_bind_address;
    match session.data_channel.open_passive(bind_ip).await {
        Ok(port) => {
            let response = format_response(port);
            send_response(writer, response.as_bytes()).await?;
            debug!("{} Passive response sent to client: {}", session.log_prefix, response.trim_end());
        }
        Err(e) => {
            warn!("{} {}", session.log_prefix, e);
            send_response(writer, e.to_ftp_response().as_bytes()).await?;
        }
    }
    Ok(())
}
