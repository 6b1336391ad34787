// framewatch-cli/src/lib.rs
//
// Library portion of the Framewatch CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ScanArgs};
pub use commands::scan::run_scan;
