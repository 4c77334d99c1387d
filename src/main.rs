use clap::Parser;
use listen_filter::cli::{self, Cli};

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(cli::exit_code(&e));
    }
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
