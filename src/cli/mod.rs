mod commands;
pub mod exit_codes;

pub use commands::Cli;

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::expr::ExprError;

/// environment variable holding a log filter directive
pub const LOG_ENV_VAR: &str = "LISTEN_FILTER_LOG";

pub fn run(cli: Cli) -> Result<()> {
    commands::execute(cli)
}

/// map an error to the process exit code
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|e| e.downcast_ref::<ExprError>().is_some()) {
        exit_codes::INVALID_EXPRESSION
    } else if err.downcast_ref::<commands::ConfigInvalid>().is_some() {
        exit_codes::CONFIG_ERROR
    } else {
        exit_codes::ERROR
    }
}

/// install the stderr log subscriber
///
/// priority: LISTEN_FILTER_LOG > -v flags > config `settings.log`
pub(crate) fn init_logging(verbose: u8, configured: &str) {
    let directive = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL));

    // a subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
