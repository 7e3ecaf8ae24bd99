#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    PWD,
    TYPE,
    CWD,
    PASV,
    EPSV,
    PORT,
    EPRT,
    LIST,
    RETR,
    QUIT,
}

impl FtpCommand {
    pub fn parse(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "SYST" => Some(FtpCommand::SYST),
            "PWD" => Some(FtpCommand::PWD),
            "TYPE" => Some(FtpCommand::TYPE),
            "CWD" => Some(FtpCommand::CWD),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "PORT" => Some(FtpCommand::PORT),
            "EPRT" => Some(FtpCommand::EPRT),
            "LIST" => Some(FtpCommand::LIST),
            "RETR" => Some(FtpCommand::RETR),
            "QUIT" => Some(FtpCommand::QUIT),
            _ => None,
        }
    }

    /// Commands that move bytes over a data connection.
    pub fn is_transfer(self) -> bool {
        matches!(self, FtpCommand::LIST | FtpCommand::RETR)
    }
}
