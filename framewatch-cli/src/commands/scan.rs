//! Implementation of the 'scan' subcommand.
//!
//! Resolves the configuration (defaults, TOML file, environment, flags),
//! discovers the videos to scan, and hands them to the core batch runner.

use crate::cli::ScanArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use crate::progress::ScanProgressBar;

use framewatch_core::{
    BatchSummary, CoreError, DetectionConfig, ImageDirectorySink, SidecarOpener, check_dependency,
    find_processable_files, has_video_extension, process_videos,
};

use log::{debug, info};

use std::fs;
use std::path::{Path, PathBuf};

/// Builds the effective configuration: file and environment first, then flags.
pub fn resolve_config(args: &ScanArgs) -> CliResult<DetectionConfig> {
    let mut config = DetectionConfig::load(args.config.as_deref())?;
    apply_arg_overrides(&mut config, args);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn apply_arg_overrides(config: &mut DetectionConfig, args: &ScanArgs) {
    if let Some(input) = &args.input_path {
        config.input_dir = input.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(mask) = &args.mask {
        config.mask_path = mask.clone();
    }
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(blur) = args.blur {
        config.blur_size = blur;
    }
    if let Some(fraction) = args.crop_fraction {
        config.crop_fraction = fraction;
    }
    if let Some(extension) = &args.extension {
        config.video_extension = extension.clone();
    }
    if let Some(extension) = &args.image_extension {
        config.image_extension = extension.clone();
    }
    if args.save_full_frame {
        config.save_full_frame = true;
    }
    if let Some(jobs) = args.jobs {
        config.workers = jobs;
    }
}

/// Discovers videos from an input path that is either one file or a directory.
///
/// A directory without matching files yields an empty list.
pub fn discover_videos(input: &Path, extension: &str) -> CliResult<Vec<PathBuf>> {
    let metadata = fs::metadata(input).map_err(|e| {
        CoreError::PathError(format!("Invalid input path '{}': {}", input.display(), e))
    })?;

    if metadata.is_dir() {
        match find_processable_files(input, extension) {
            Ok(files) => Ok(files),
            Err(CoreError::NoFilesFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    } else if has_video_extension(input, extension) {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(CoreError::PathError(format!(
            "Input file '{}' is not a .{} file",
            input.display(),
            extension
        )))
    }
}

/// Runs the scan. Returns `None` when there was nothing to scan.
pub fn run_scan(args: ScanArgs) -> CliResult<Option<BatchSummary>> {
    let config = resolve_config(&args)?;
    let input = config.input_dir.clone();

    let files = discover_videos(&input, config.video_extension())?;
    if files.is_empty() {
        info!("No .{} files found in {}", config.video_extension(), input.display());
        output::print_no_files(&input, config.video_extension());
        return Ok(None);
    }
    info!("Found {} file(s) to scan", files.len());

    fs::create_dir_all(&config.output_dir).cli_context(format!(
        "Failed to create output directory '{}'",
        config.output_dir.display()
    ))?;

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    debug!("External dependency check passed.");

    output::print_scan_header(&config, &input, files.len(), config.effective_workers());

    let sink = ImageDirectorySink::from_config(&config)?;
    let progress = ScanProgressBar::new();
    let summary = process_videos(&SidecarOpener, &sink, &config, &files, &progress)?;

    output::print_summary(&summary);
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config() {
        let args = ScanArgs {
            input_path: Some(PathBuf::from("clips")),
            threshold: Some(1234),
            blur: Some(3),
            save_full_frame: true,
            jobs: Some(2),
            ..Default::default()
        };
        let mut config = DetectionConfig::default();
        apply_arg_overrides(&mut config, &args);

        assert_eq!(config.input_dir, PathBuf::from("clips"));
        assert_eq!(config.threshold, 1234);
        assert_eq!(config.blur_size, 3);
        assert!(config.save_full_frame);
        assert_eq!(config.workers, 2);
        assert_eq!(config.interval_secs, 3);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("porch.MP4");
        File::create(&video).unwrap();
        let other = dir.path().join("porch.avi");
        File::create(&other).unwrap();

        assert_eq!(discover_videos(&video, "mp4").unwrap(), vec![video.clone()]);
        assert!(discover_videos(&other, "mp4").is_err());
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover_videos(dir.path(), "mp4").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_path() {
        let result = discover_videos(Path::new("surely/not/here"), "mp4");
        assert!(matches!(result, Err(CoreError::PathError(_))));
    }
}
