// ============================================================================
// framewatch-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Frame Decoding and External Command Checks
//
// This module encapsulates the pipeline's only external dependency: turning a
// video file into decoded frames. The FrameSource/SourceOpener traits are the
// seam; the ffmpeg-sidecar implementation is used in production and the
// scripted implementation in tests.
//
// KEY COMPONENTS:
// - FrameSource / SourceOpener traits
// - SidecarOpener: ffprobe + ffmpeg-sidecar implementation
// - ScriptedOpener: in-memory implementation
// - check_dependency: verifies ffmpeg/ffprobe are executable

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Frame source traits and frame rate helpers
pub mod frame_source;

/// Frame decoding through ffprobe and ffmpeg-sidecar
pub mod sidecar_source;

/// Scripted in-memory frame sources
pub mod scripted;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use frame_source::{FrameSource, SourceOpener, parse_frame_rate, validate_frame_rate};
pub use scripted::{ScriptedOpener, ScriptedSource, ScriptedStep};
pub use sidecar_source::{SidecarFrameSource, SidecarOpener};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs `cmd_name -version` with output discarded.
///
/// # Returns
///
/// * `Ok(())` - If the command started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not on PATH
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_is_reported() {
        let result = check_dependency("framewatch-no-such-command-xyz");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
