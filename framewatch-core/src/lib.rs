//! Core library for sparse motion detection in batches of videos.
//!
//! Each video is decoded with ffmpeg, and only frame pairs on a fixed time
//! cadence are examined. A sampled pair is cropped to the lower part of the
//! frame, masked, median-smoothed and differenced. When the summed difference
//! exceeds the threshold, the first frame of the pair is written out as an
//! image.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framewatch_core::{
//!     DetectionConfig, ImageDirectorySink, NullBatchProgress, SidecarOpener,
//!     find_processable_files, process_videos,
//! };
//!
//! let config = DetectionConfig::load(None).unwrap();
//! config.validate().unwrap();
//!
//! let files = find_processable_files(&config.input_dir, config.video_extension()).unwrap();
//! let sink = ImageDirectorySink::from_config(&config).unwrap();
//!
//! let summary = process_videos(&SidecarOpener, &sink, &config, &files, &NullBatchProgress).unwrap();
//! println!(
//!     "{} of {} videos scanned, {} detections",
//!     summary.succeeded(),
//!     summary.attempted(),
//!     summary.total_detections()
//! );
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod frame;
pub mod output;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use batch::{
    BatchProgress, BatchRunner, BatchSummary, NullBatchProgress, VideoOutcome, process_videos,
};
pub use config::{DetectionConfig, DetectionConfigBuilder};
pub use discovery::{find_processable_files, has_video_extension};
pub use error::{CoreError, CoreResult};
pub use external::{
    FrameSource, ScriptedOpener, ScriptedSource, ScriptedStep, SidecarOpener, SourceOpener,
    check_dependency,
};
pub use frame::{Frame, Intensity};
pub use output::{DetectionEvent, DetectionSink, ImageDirectorySink, artifact_file_name};
pub use processing::{
    DetectionPipeline, FrameNormalizer, Mask, MotionScore, RegionOfInterest, SamplingCadence,
    VideoSummary,
};
pub use utils::{format_duration, get_filename_safe};
