use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use particle_balance::cli::Cli;
use particle_balance::logging::setup_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli.log_dir) {
        eprintln!("Failed to set up logging in {:?}: {}", cli.log_dir, e);
        return ExitCode::FAILURE;
    }
    info!("Starting particle-balance");

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
