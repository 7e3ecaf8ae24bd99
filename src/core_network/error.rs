// Errors raised while negotiating or opening a data connection
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("No data channel negotiated")]
    NotNegotiated,

    #[error("Failed to bind passive listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Failed to accept data connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Failed to connect to {0}: {1}")]
    Connect(SocketAddr, #[source] std::io::Error),

    #[error("Malformed address argument: {0:?}")]
    Syntax(String),
}

impl DataChannelError {
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            DataChannelError::NotNegotiated => "425 Use PASV or PORT/EPRT first.\r\n",
            DataChannelError::Bind(_) => "425 Can't open passive connection.\r\n",
            DataChannelError::Accept(_) | DataChannelError::Connect(..) => {
                "425 Can't open data connection.\r\n"
            }
            DataChannelError::Syntax(_) => "501 Syntax error in parameters or arguments.\r\n",
        }
    }
}
