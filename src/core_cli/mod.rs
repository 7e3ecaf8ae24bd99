use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "decoyftpd",
    about = "A decoy FTP server that answers from a synthetic filesystem."
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides server.listen_address
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
