//! Motion detection for a single video.
//!
//! The submodules follow the data flow: a sampled pair of frames is cropped to
//! the region of interest, normalized (intensity, mask, smoothing), scored,
//! and compared to the threshold by the pipeline.

/// Region of interest crop and the inclusion mask
pub mod region;

/// Intensity conversion, masking and median smoothing
pub mod normalize;

/// Summed absolute difference of two normalized frames
pub mod score;

/// Frame stride between scored pairs
pub mod cadence;

/// Per-video state machine and detection pipeline
pub mod pipeline;

pub use cadence::SamplingCadence;
pub use normalize::FrameNormalizer;
pub use pipeline::{DetectionPipeline, PairScan, SampledPair, ScanState, VideoSummary};
pub use region::{Mask, RegionOfInterest};
pub use score::{MotionScore, score};
