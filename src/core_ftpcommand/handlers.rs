use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{cwd, list, pass, pwd, quit, retr, syst, type_, user};
use crate::helpers::send_response;
use crate::server::ServerState;
use crate::session::Session;
use tokio::io::AsyncWrite;

// Specific crates for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

/// Runs one parsed command against the session and writes its replies.
///
/// An `Err` means the control connection itself failed; every protocol-level
/// failure is answered with a reply and returns `Ok`.
pub async fn dispatch_command<W>(
    command: &str,
    writer: &mut W,
    state: &ServerState,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(command) = FtpCommand::parse(command) else {
        return send_response(writer, b"502 Command not implemented.\r\n").await;
    };

    if command.is_transfer() {
        session.begin_transfer();
    }

    let result = match command {
        FtpCommand::USER => user::handle_user_command(writer, state, session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(writer, state, session, arg).await,
        FtpCommand::SYST => syst::handle_syst_command(writer).await,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, session).await,
        FtpCommand::TYPE => type_::handle_type_command(writer, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, state, session, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, state, session, arg).await,
        FtpCommand::EPSV => pasv::handle_epsv_command(writer, state, session, arg).await,
        FtpCommand::PORT => port::handle_port_command(writer, state, session, arg).await,
        FtpCommand::EPRT => port::handle_eprt_command(writer, state, session, arg).await,
        FtpCommand::LIST => list::handle_list_command(writer, state, session, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(writer, state, session, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(writer, session).await,
    };

    session.end_transfer();
    result
}
