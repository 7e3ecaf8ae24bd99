use crate::core_ftpcommand::handlers::dispatch_command;
use crate::constants::MAX_COMMAND_LINE;
use crate::core_log::audit::CommandLog;
use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::net::TcpListener;

/// Binds the control listener and serves connections on it.
pub async fn start_server(state: Arc<ServerState>) -> Result<()> {
    let listen_address = state.config.server.listen_address;
    let listener = TcpListener::bind(listen_address)
        .await
        .with_context(|| format!("Failed to bind control listener on {}", listen_address))?;
    info!("Server listening on {}", listen_address);

    serve(listener, state).await
}

/// Accepts control connections forever, one task per connection.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept error: {}", e);
                continue;
            }
        };

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, addr, state).await {
                warn!("[{}] Connection error: {:#}", addr, e);
            }
            info!("[{}] Connection closed", addr);
        });
    }
}

/// Splits a control line into its upper-cased command and the raw argument.
/// Only the first whitespace separates them; the argument is kept as sent.
pub fn parse_command_line(line: &str) -> (String, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command.to_ascii_uppercase(), argument),
        None => (line.to_ascii_uppercase(), ""),
    }
}

/// Runs one control connection: banner, then read, record and dispatch each
/// command in turn until QUIT, EOF, an oversized line or a transport error.
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, state: Arc<ServerState>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(peer);
    info!("{} New connection", session.log_prefix);

    let result = command_loop(&mut reader, &mut writer, &state, &mut session).await;

    session.close();
    result
}

async fn command_loop<R, W>(
    reader: &mut R,
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    send_banner(writer, state).await?;

    let mut buffer = Vec::new();
    while !session.is_closed() {
        buffer.clear();
        let n = (&mut *reader)
            .take(MAX_COMMAND_LINE as u64)
            .read_until(b'\n', &mut buffer)
            .await
            .context("Failed to read from control connection")?;
        if n == 0 {
            debug!("{} Client disconnected", session.log_prefix);
            break;
        }
        if n == MAX_COMMAND_LINE && buffer.last() != Some(&b'\n') {
            warn!(
                "{} Command line exceeds {} bytes, closing session",
                session.log_prefix, MAX_COMMAND_LINE
            );
            send_response(writer, b"500 Command line too long.\r\n").await?;
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("{} Received: {}", session.log_prefix, line);

        let (command, argument) = parse_command_line(line);
        state.audit.record(&CommandLog::now(
            &session.peer.to_string(),
            &command,
            argument,
            &session.current_dir,
        ));

        dispatch_command(&command, writer, state, session, argument)
            .await
            .with_context(|| format!("Error handling command {}", command))?;
    }
    Ok(())
}

async fn send_banner<W>(writer: &mut W, state: &ServerState) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    for line in &state.banner {
        send_response(writer, format!("220-{}\r\n", line).as_bytes()).await?;
    }
    let welcome = format!("220 {}\r\n", state.config.server.welcome_message);
    send_response(writer, welcome.as_bytes()).await
}
