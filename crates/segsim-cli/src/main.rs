use segsim_core::logging;

mod cli;

use crate::cli::CliCommand;

// Current-thread runtime: "parallel" segments are interleaved tasks on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("segsim error: {:#}", err);
        std::process::exit(1);
    }
}
