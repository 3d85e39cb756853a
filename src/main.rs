//! DupeScan - Content-Hash Duplicate Finder
//!
//! Entry point for the DupeScan CLI application.

use clap::Parser;
use dupescan::{
    cli::Cli,
    duplicates::PipelineError,
    error::ExitCode,
};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Run the application logic
    match dupescan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            // Determine appropriate exit code for errors
            let exit_code = if err
                .downcast_ref::<PipelineError>()
                .is_some_and(|e| matches!(e, PipelineError::Interrupted))
            {
                ExitCode::Interrupted
            } else {
                ExitCode::GeneralError
            };

            // Report the error
            eprintln!("[{}] Error: {}", exit_code.code_prefix(), err);

            std::process::exit(exit_code.as_i32());
        }
    }
}
