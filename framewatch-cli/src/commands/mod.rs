//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `scan` command.
/// This command runs motion detection over a directory of videos.
pub mod scan;
