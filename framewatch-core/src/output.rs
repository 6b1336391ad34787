// ============================================================================
// framewatch-core/src/output.rs
// ============================================================================
//
// DETECTION OUTPUT: Events and the Sinks that Persist Them
//
// A DetectionEvent is produced when a scored pair exceeds the threshold and is
// handed to a DetectionSink straight away. The production sink writes one
// image per event into a flat directory, named from the video file name, the
// sampled frame index and the score.
//
// Each image is encoded into a temporary file inside the output directory and
// renamed into place, so an abandoned worker never leaves a partial image
// under a final name.

// ---- Internal crate imports ----
use crate::config::DetectionConfig;
use crate::error::{CoreError, CoreResult, output_write_failure};
use crate::frame::Frame;
use crate::processing::score::MotionScore;
use crate::utils::get_filename_safe;

// ---- External crate imports ----
use image::ImageFormat;
use log::info;

// ---- Standard library imports ----
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// EVENTS AND SINKS
// ============================================================================

/// A pair whose score exceeded the threshold.
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    /// Video the pair was decoded from
    pub video: PathBuf,
    /// Decode counter value when the pair completed
    pub frame_index: u64,
    pub score: MotionScore,
    /// First frame of the pair, cropped unless full frames were requested
    pub frame: Frame,
}

/// Receives detection events as they happen. Shared by all batch workers.
pub trait DetectionSink: Send + Sync {
    fn emit(&self, event: DetectionEvent) -> CoreResult<()>;
}

/// Builds `{video file name}_{frame index}_{score}.{extension}`.
pub fn artifact_file_name(
    video: &Path,
    frame_index: u64,
    score: MotionScore,
    extension: &str,
) -> CoreResult<String> {
    let video_name = get_filename_safe(video)?;
    Ok(format!(
        "{}_{}_{}.{}",
        video_name,
        frame_index,
        score,
        extension.trim_start_matches('.')
    ))
}

// ============================================================================
// IMAGE DIRECTORY SINK
// ============================================================================

/// Writes every detection as an image file into one flat directory.
///
/// The directory is not created here; a missing directory is reported as an
/// `OutputWriteFailure` for the video being processed.
#[derive(Debug, Clone)]
pub struct ImageDirectorySink {
    output_dir: PathBuf,
    extension: String,
    format: ImageFormat,
}

impl ImageDirectorySink {
    /// Creates a sink writing images of the format named by `extension`.
    pub fn new(output_dir: impl Into<PathBuf>, extension: &str) -> CoreResult<Self> {
        let extension = extension.trim_start_matches('.').to_string();
        let format = ImageFormat::from_extension(&extension).ok_or_else(|| {
            CoreError::Config(format!("Unsupported image extension '{extension}'"))
        })?;
        Ok(Self {
            output_dir: output_dir.into(),
            extension,
            format,
        })
    }

    /// Creates the sink described by the output settings of `config`.
    pub fn from_config(config: &DetectionConfig) -> CoreResult<Self> {
        config.image_format()?;
        Self::new(config.output_dir.clone(), &config.image_extension)
    }

    /// Destination path for an event.
    pub fn path_for(&self, event: &DetectionEvent) -> CoreResult<PathBuf> {
        let name = artifact_file_name(
            &event.video,
            event.frame_index,
            event.score,
            &self.extension,
        )?;
        Ok(self.output_dir.join(name))
    }

    /// Encodes the event's frame and moves it into place. Returns the final path.
    pub fn write(&self, event: &DetectionEvent) -> CoreResult<PathBuf> {
        let destination = self.path_for(event)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".framewatch-")
            .suffix(&format!(".{}.part", self.extension))
            .tempfile_in(&self.output_dir)
            .map_err(|e| output_write_failure(&destination, e))?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            event
                .frame
                .write_to(&mut writer, self.format)
                .map_err(|e| output_write_failure(&destination, e))?;
            writer
                .flush()
                .map_err(|e| output_write_failure(&destination, e))?;
        }

        temp.persist(&destination)
            .map_err(|e| output_write_failure(&destination, e.error))?;
        Ok(destination)
    }
}

impl DetectionSink for ImageDirectorySink {
    fn emit(&self, event: DetectionEvent) -> CoreResult<()> {
        let path = self.write(&event)?;
        info!(
            "Motion in {} at frame {} (score {}): {}",
            event.video.display(),
            event.frame_index,
            event.score,
            path.display()
        );
        Ok(())
    }
}
