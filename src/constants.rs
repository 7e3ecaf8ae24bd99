// src/constants.rs

pub const DEFAULT_CONFIG_PATH: &str = "/etc/decoyftpd.conf";
pub const DEFAULT_COMMAND_LOG: &str = "commands.jsonl";

pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Welcome to the file server, if you are not authorized please disconnect.";

/// Body served for every RETR, whatever file was asked for.
pub const DEFAULT_PAYLOAD: &str = "\
This file could not be restored from the archive.

The original contents were moved during the storage migration. If you need
this document, open a ticket with the infrastructure team and reference the
path you requested.
";

pub const DEFAULT_MIN_FILES: usize = 10;
pub const DEFAULT_MAX_FILES: usize = 30;

/// Longest control line accepted, terminator included.
pub const MAX_COMMAND_LINE: usize = 4096;
