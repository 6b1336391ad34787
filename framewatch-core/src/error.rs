// ============================================================================
// framewatch-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for framewatch-core
//
// This module defines the error types used throughout the framewatch-core
// library. Every per-video fault (unreadable video, missing mask, bad frame
// rate, dimension mismatch, failed image write) is a distinct variant so the
// batch runner can report the reason for each failed video without stopping
// its siblings.
//
// KEY COMPONENTS:
// - CoreError: Enum of all possible error types
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for common error construction

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Custom error type for the framewatch-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Per-video detection errors ----

    /// The video file does not exist, cannot be probed, or cannot be decoded.
    #[error("Unreadable video '{path}': {reason}")]
    UnreadableVideo { path: PathBuf, reason: String },

    /// The mask image is absent or cannot be decoded as an image.
    #[error("Missing or unreadable mask '{path}': {reason}")]
    MissingMask { path: PathBuf, reason: String },

    /// The source reported a frame rate that truncates to zero or is not finite.
    #[error("Invalid frame rate reported by video source: {rate}")]
    InvalidFrameRate { rate: f64 },

    /// Two grids that must share a shape do not.
    #[error(
        "Dimension mismatch ({context}): expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}"
    )]
    DimensionMismatch {
        context: String,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// A detection image could not be written to the output directory.
    #[error("Failed to write detection image '{path}': {reason}")]
    OutputWriteFailure { path: PathBuf, reason: String },

    // ---- General errors ----

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Required external command '{0}' not found or failed to execute")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("No processable video files found in the input directory")]
    NoFilesFound,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Type alias for Result with CoreError.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Short, stable label for the error kind, used in summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::UnreadableVideo { .. } => "UnreadableVideo",
            CoreError::MissingMask { .. } => "MissingMask",
            CoreError::InvalidFrameRate { .. } => "InvalidFrameRate",
            CoreError::DimensionMismatch { .. } => "DimensionMismatch",
            CoreError::OutputWriteFailure { .. } => "OutputWriteFailure",
            CoreError::Io(_) => "Io",
            CoreError::Config(_) => "Config",
            CoreError::PathError(_) => "PathError",
            CoreError::DependencyNotFound(_) => "DependencyNotFound",
            CoreError::CommandStart(..) => "CommandStart",
            CoreError::NoFilesFound => "NoFilesFound",
            CoreError::OperationFailed(_) => "OperationFailed",
        }
    }
}

// ============================================================================
// ERROR HELPER FUNCTIONS
// ============================================================================

/// Creates an `UnreadableVideo` error for the given path.
pub fn unreadable_video(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::UnreadableVideo {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Creates a `DimensionMismatch` error from two `(width, height)` pairs.
pub fn dimension_mismatch(
    context: impl Into<String>,
    expected: (u32, u32),
    actual: (u32, u32),
) -> CoreError {
    CoreError::DimensionMismatch {
        context: context.into(),
        expected_width: expected.0,
        expected_height: expected.1,
        actual_width: actual.0,
        actual_height: actual.1,
    }
}

/// Creates an `OutputWriteFailure` error for the given destination.
pub fn output_write_failure(path: &Path, reason: impl ToString) -> CoreError {
    CoreError::OutputWriteFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}
