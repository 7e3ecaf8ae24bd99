use crate::helpers::send_response;
use log::{debug, error};
use tokio::io::AsyncWrite;

/// Handles the SYST (System) FTP command.
///
/// This function sends a response to the client indicating the system type of the server.
///
/// # Arguments
///
/// * `writer` - The control connection to reply on.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_syst_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    // Define the system type. Typically "UNIX" for Unix-like systems.
    let system_type = "215 UNIX Type: L8\r\n";

    debug!("Responding to SYST command with system type.");

    if let Err(e) = send_response(writer, system_type.as_bytes()).await {
        error!("Failed to send SYST response: {}", e);
        return Err(e);
    }

    Ok(())
}
