// framewatch-cli/src/main.rs
//
// Entry point for the `framewatch` binary: parses arguments, installs the
// logger, runs the selected command and maps the outcome to an exit code.
// A scan in which any video failed exits with status 1.

use clap::Parser;
use framewatch_cli::{Cli, Commands, logging, output, run_scan};
use std::process;

fn main() {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Scan(args) => args.log_dir.clone(),
    };
    let setup = logging::resolve_level(cli.verbose, cli.log_level.as_deref())
        .and_then(|level| logging::init_logging(level, log_dir.as_deref()));
    match setup {
        Ok(Some(path)) => log::debug!("Writing log file {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            output::print_error(&e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Scan(args) => run_scan(args),
    };

    match result {
        Ok(Some(summary)) if summary.has_failures() => {
            log::warn!(
                "{} of {} video(s) failed",
                summary.failed(),
                summary.attempted()
            );
            process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            output::print_error(&e);
            process::exit(1);
        }
    }
}
