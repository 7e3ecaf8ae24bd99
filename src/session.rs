use crate::core_network::datachannel::DataChannel;
use log::debug;
use std::net::SocketAddr;

/// Lifecycle of a control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    /// A LIST or RETR is running.
    InTransfer,
    Closed,
}

/// Per-connection state. Owned by exactly one connection task.
#[derive(Debug)]
pub struct Session {
    /// Always an existing directory of the virtual filesystem.
    pub current_dir: String,
    pub data_channel: DataChannel,
    pub state: SessionState,
    pub peer: SocketAddr,
    pub log_prefix: String,
}

impl Session {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            current_dir: String::from("/"),
            data_channel: DataChannel::None,
            state: SessionState::Connected,
            peer,
            log_prefix: format!("[{}]", peer),
        }
    }

    pub fn begin_transfer(&mut self) {
        if self.state == SessionState::Connected {
            self.state = SessionState::InTransfer;
        }
    }

    pub fn end_transfer(&mut self) {
        if self.state == SessionState::InTransfer {
            self.state = SessionState::Connected;
        }
    }

    /// Moves to the terminal state and releases any data channel.
    pub fn close(&mut self) {
        self.data_channel.close_all();
        if self.state != SessionState::Closed {
            debug!("{} Session closed", self.log_prefix);
        }
        self.state = SessionState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }
}
