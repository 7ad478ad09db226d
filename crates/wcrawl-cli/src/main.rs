use wcrawl_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the XDG state file; fall back to stderr if it cannot be opened.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("wcrawl error: {:#}", err);
        std::process::exit(1);
    }
}
