//! Utility functions for formatting and path handling.

use crate::error::{CoreError, CoreResult};

use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Extracts the file name component of a path as a String.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    let name = path.file_name().ok_or_else(|| {
        CoreError::PathError(format!("Failed to get filename for {}", path.display()))
    })?;
    Ok(name.to_string_lossy().to_string())
}
