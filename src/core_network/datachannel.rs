use crate::core_network::error::DataChannelError;
use log::debug;
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, TcpStream};

/// Observable mode of a session's data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChannelMode {
    None,
    PassiveListening,
    ActiveTargetSet,
}

/// The pending data channel of a session. At most one exists at a time;
/// installing a new one drops (and so closes) the previous one.
#[derive(Debug, Default)]
pub enum DataChannel {
    #[default]
    None,
    Passive(TcpListener),
    Active(SocketAddr),
}

impl DataChannel {
    pub fn mode(&self) -> DataChannelMode {
        match self {
            DataChannel::None => DataChannelMode::None,
            DataChannel::Passive(_) => DataChannelMode::PassiveListening,
            DataChannel::Active(_) => DataChannelMode::ActiveTargetSet,
        }
    }

    /// Port of the pending passive listener, if any.
    pub fn passive_port(&self) -> Option<u16> {
        match self {
            DataChannel::Passive(listener) => listener.local_addr().ok().map(|a| a.port()),
            _ => None,
        }
    }

    /// Closes whatever is pending. Safe to call repeatedly.
    pub fn close_all(&mut self) {
        if self.mode() != DataChannelMode::None {
            debug!(
                "Closing pending {:?} data channel (port {:?})",
                self.mode(),
                self.passive_port()
            );
        }
        *self = DataChannel::None;
    }

    /// Binds a one-shot listener on an ephemeral port and makes it the pending
    /// channel. The previous channel is closed first, so a bind failure leaves
    /// nothing pending.
    pub async fn open_passive(&mut self, bind_ip: IpAddr) -> Result<u16, DataChannelError> {
        self.close_all();
        let listener = TcpListener::bind((bind_ip, 0))
            .await
            .map_err(DataChannelError::Bind)?;
        let port = listener
            .local_addr()
            .map_err(DataChannelError::Bind)?
            .port();
        debug!("Passive listener bound on {}:{}", bind_ip, port);
        *self = DataChannel::Passive(listener);
        Ok(port)
    }

    pub fn set_active_target(&mut self, target: SocketAddr) {
        self.close_all();
        debug!("Active data target set to {}", target);
        *self = DataChannel::Active(target);
    }

    /// Turns the pending channel into a connected stream: accepts exactly one
    /// connection on a passive listener, or dials the active target. The
    /// pending state is consumed whether or not this succeeds.
    pub async fn obtain_connection(&mut self) -> Result<TcpStream, DataChannelError> {
        match std::mem::take(self) {
            DataChannel::Passive(listener) => {
                let (stream, addr) = listener.accept().await.map_err(DataChannelError::Accept)?;
                debug!("Accepted data connection from: {}", addr);
                Ok(stream)
            }
            DataChannel::Active(target) => {
                let stream = TcpStream::connect(target)
                    .await
                    .map_err(|e| DataChannelError::Connect(target, e))?;
                debug!("Data connection established with {}", target);
                Ok(stream)
            }
            DataChannel::None => Err(DataChannelError::NotNegotiated),
        }
    }
}
