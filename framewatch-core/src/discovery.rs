//! File discovery module for finding video files to process.
//!
//! Only the top level of the input directory is searched, and only files with
//! the configured container extension (case-insensitive) are returned.

use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Returns true if `path` has the given extension, ignoring ASCII case.
#[must_use]
pub fn has_video_extension(path: &Path, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Finds video files eligible for processing in the specified directory.
///
/// Results are sorted so runs over the same directory schedule files in the
/// same order.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the matching files
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no file matches
///
/// # Examples
///
/// ```rust,no_run
/// use framewatch_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("./videos"), "mp4") {
///     Ok(files) => println!("Found {} video files", files.len()),
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path, extension: &str) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && has_video_extension(&path, extension)).then_some(path)
        })
        .collect();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        files.sort();
        Ok(files)
    }
}
