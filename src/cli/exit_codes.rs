//! exit codes for listen-filter commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error.
//! clap uses 2 for invalid command-line arguments.

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// filter, edit, time bound or list source could not be parsed
pub const INVALID_EXPRESSION: i32 = 3;

/// configuration file error
pub const CONFIG_ERROR: i32 = 4;
