// ============================================================================
// framewatch-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias shared with the core library
//
// The CLI reports the same error type as framewatch-core, adding context only
// where a path or command-line value explains the failure.

// ---- Internal crate imports ----
use framewatch_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Adds context to a failed result, producing an `OperationFailed` error.
pub trait CliErrorContext<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", context, core_error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_cli_context_wraps_message() {
        let result: Result<(), io::Error> = Err(io::Error::other("disk full"));
        let err = result.cli_context("Failed to create output directory").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to create output directory"));
        assert!(message.contains("disk full"));
    }
}
