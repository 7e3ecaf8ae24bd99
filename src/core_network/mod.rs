pub mod datachannel;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

#[cfg(test)]
mod test_session;
