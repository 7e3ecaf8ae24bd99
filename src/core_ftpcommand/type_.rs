use crate::helpers::send_response;
use tokio::io::AsyncWrite;

/// Handles the TYPE FTP command.
///
/// Nothing is stored: transfers are never converted. Binary (`I`) gets its
/// own acknowledgement, every other type a generic one.
pub async fn handle_type_command<W>(writer: &mut W, arg: &str) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let response: &[u8] = if arg.trim().eq_ignore_ascii_case("I") {
        b"200 Switching to Binary mode.\r\n"
    } else {
        b"200 OK\r\n"
    };
    send_response(writer, response).await
}
