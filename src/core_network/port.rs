use crate::core_network::error::DataChannelError;
use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::AsyncWrite;

/// Parses a PORT argument: `a1,a2,a3,a4,p1,p2`, port = p1 * 256 + p2.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddr, DataChannelError> {
    let syntax = || DataChannelError::Syntax(arg.to_string());

    let parts: Vec<u8> = arg
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| syntax())?;
    if parts.len() != 6 {
        return Err(syntax());
    }

    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = u16::from(parts[4]) * 256 + u16::from(parts[5]);
    Ok(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Parses an EPRT argument. Its first character is the delimiter; the fields
/// after it are protocol family, address and port (`|1|10.0.0.5|6275|`).
pub fn parse_eprt_argument(arg: &str) -> Result<SocketAddr, DataChannelError> {
    let syntax = || DataChannelError::Syntax(arg.to_string());

    let delimiter = arg.chars().next().ok_or_else(syntax)?;
    let fields: Vec<&str> = arg.split(delimiter).collect();
    if fields.len() < 4 {
        return Err(syntax());
    }

    let ip: IpAddr = fields[2].parse().map_err(|_| syntax())?;
    let port: u16 = fields[3].parse().map_err(|_| syntax())?;
    Ok(SocketAddr::new(ip, port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the target; the connection is dialed when a transfer starts.
pub async fn handle_port_command<W>(
    writer: &mut W,
    _state: &ServerState,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    match parse_port_argument(arg) {
        Ok(target) => {
            session.data_channel.set_active_target(target);
            info!("{} Received PORT command with target {}", session.log_prefix, target);
            send_response(writer, b"200 PORT command successful.\r\n").await?;
        }
        Err(e) => {
            warn!("{} {}", session.log_prefix, e);
            send_response(writer, e.to_ftp_response().as_bytes()).await?;
        }
    }
    Ok(())
}

/// Handles the EPRT (Extended Active Mode) FTP command.
pub async fn handle_eprt_command<W>(
    writer: &mut W,
    _state: &ServerState,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    match parse_eprt_argument(arg) {
        Ok(target) => {
            session.data_channel.set_active_target(target);
            info!("{} Received EPRT command with target {}", session.log_prefix, target);
            send_response(writer, b"200 EPRT command successful.\r\n").await?;
        }
        Err(e) => {
            warn!("{} {}", session.log_prefix, e);
            send_response(writer, e.to_ftp_response().as_bytes()).await?;
        }
    }
    Ok(())
}
