// ============================================================================
// framewatch-core/src/processing/pipeline.rs
// ============================================================================
//
// DETECTION PIPELINE: Per-Video Pair Sampling, Scoring and Emission
//
// One video is processed in a single forward pass:
//
//   Opening -> Sampling -> (ScoringPair)* -> Closed
//
// Frames are decoded in consecutive pairs. Every successful decode advances a
// counter, and a pair is scored only when the counter is an exact multiple of
// the sampling stride after the second frame of the pair. Pairs outside that
// alignment are dropped without any image work. A trailing frame without a
// partner is dropped too.
//
// KEY COMPONENTS:
// - PairScan: the Sampling/ScoringPair/Closed state machine over a FrameSource
// - DetectionPipeline: crop, normalize, score and emit for each sampled pair
// - VideoSummary: what happened to one video

// ---- Internal crate imports ----
use crate::config::DetectionConfig;
use crate::error::{CoreResult, dimension_mismatch};
use crate::external::{FrameSource, SourceOpener};
use crate::frame::Frame;
use crate::output::{DetectionEvent, DetectionSink};
use crate::processing::cadence::SamplingCadence;
use crate::processing::normalize::FrameNormalizer;
use crate::processing::region::{Mask, RegionOfInterest};
use crate::processing::score::{MotionScore, score};

// ---- External crate imports ----
use log::{debug, trace};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// PAIR SCAN STATE MACHINE
// ============================================================================

/// Position of a [`PairScan`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Decoding pairs and discarding those off the cadence
    Sampling,
    /// A sampled pair has been handed out and is being scored
    ScoringPair,
    /// End-of-stream or decode failure; the source has been released
    Closed,
}

/// Two consecutively decoded frames at a sampled boundary.
#[derive(Debug, Clone)]
pub struct SampledPair {
    /// Decode counter after the second frame
    pub index: u64,
    pub first: Frame,
    pub second: Frame,
}

/// Walks a frame source pair by pair and yields only the sampled pairs.
pub struct PairScan<S: FrameSource> {
    source: Option<S>,
    cadence: SamplingCadence,
    frame_count: u64,
    frame_size: Option<(u32, u32)>,
    state: ScanState,
}

impl<S: FrameSource> PairScan<S> {
    pub fn new(source: S, cadence: SamplingCadence) -> Self {
        Self {
            source: Some(source),
            cadence,
            frame_count: 0,
            frame_size: None,
            state: ScanState::Sampling,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Frames successfully decoded so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Decodes until the next sampled pair. `Ok(None)` once the stream ends.
    ///
    /// Any error closes the scan.
    pub fn next_pair(&mut self) -> CoreResult<Option<SampledPair>> {
        if self.state == ScanState::ScoringPair {
            self.state = ScanState::Sampling;
        }

        while self.state == ScanState::Sampling {
            let Some(first) = self.decode()? else {
                break;
            };
            let Some(second) = self.decode()? else {
                trace!("Dropping unpaired trailing frame {}", self.frame_count);
                break;
            };

            if self.cadence.is_sampled(self.frame_count) {
                self.state = ScanState::ScoringPair;
                return Ok(Some(SampledPair {
                    index: self.frame_count,
                    first,
                    second,
                }));
            }
            trace!("Skipping pair ending at frame {}", self.frame_count);
        }

        self.close();
        Ok(None)
    }

    /// Releases the source. Safe to call more than once.
    pub fn close(&mut self) {
        self.state = ScanState::Closed;
        self.source = None;
    }

    fn decode(&mut self) -> CoreResult<Option<Frame>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.close();
                return Err(e);
            }
        };

        let size = frame.dimensions();
        match self.frame_size {
            None => self.frame_size = Some(size),
            Some(expected) if expected != size => {
                self.close();
                return Err(dimension_mismatch(
                    format!("frame {} resolution", self.frame_count + 1),
                    expected,
                    size,
                ));
            }
            Some(_) => {}
        }

        self.frame_count += 1;
        Ok(Some(frame))
    }
}

// ============================================================================
// DETECTION PIPELINE
// ============================================================================

/// What the pipeline observed for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSummary {
    pub path: PathBuf,
    /// Integer frame rate used for the cadence
    pub frame_rate: u32,
    /// Frame-index stride between scored pairs
    pub stride: u64,
    pub frames_decoded: u64,
    pub pairs_scored: u64,
    pub detections: u64,
    /// Highest score of any scored pair
    pub peak_score: Option<MotionScore>,
}

/// Runs detection for single videos. Holds no per-video state, so one
/// instance can be shared by every worker of a batch.
pub struct DetectionPipeline<'a, O: SourceOpener> {
    opener: &'a O,
    region: RegionOfInterest,
    normalizer: FrameNormalizer,
    interval_secs: u32,
    threshold: u64,
    save_full_frame: bool,
}

impl<'a, O: SourceOpener> DetectionPipeline<'a, O> {
    pub fn new(opener: &'a O, mask: Arc<Mask>, config: &DetectionConfig) -> Self {
        Self {
            opener,
            region: RegionOfInterest::new(config.crop_fraction),
            normalizer: FrameNormalizer::new(mask, config.blur_size),
            interval_secs: config.interval_secs,
            threshold: config.threshold,
            save_full_frame: config.save_full_frame,
        }
    }

    /// Processes one video to completion, emitting a detection for every
    /// sampled pair whose score exceeds the threshold.
    ///
    /// Fails with `UnreadableVideo`, `InvalidFrameRate`, `DimensionMismatch`
    /// or the sink's error; the failure concerns this video only.
    pub fn process_video(&self, path: &Path, sink: &dyn DetectionSink) -> CoreResult<VideoSummary> {
        let source = self.opener.open(path)?;
        let frame_rate = source.frame_rate()?;
        let cadence = SamplingCadence::new(self.interval_secs, frame_rate)?;
        debug!(
            "Scanning {} at {} fps (reported {:.3}), stride {} frames",
            path.display(),
            frame_rate,
            source.reported_frame_rate(),
            cadence.stride()
        );

        let mut scan = PairScan::new(source, cadence);
        let mut pairs_scored = 0;
        let mut detections = 0;
        let mut peak_score: Option<MotionScore> = None;

        while let Some(pair) = scan.next_pair()? {
            if pairs_scored == 0 {
                let (width, height) = pair.first.dimensions();
                self.normalizer
                    .mask()
                    .check_dimensions(self.region.cropped_size(width, height))?;
            }

            let first = self.region.crop(&pair.first);
            let second = self.region.crop(&pair.second);
            let pair_score = score(
                &self.normalizer.normalize(&first)?,
                &self.normalizer.normalize(&second)?,
            )?;
            pairs_scored += 1;
            peak_score = peak_score.max(Some(pair_score));
            debug!(
                "{} frame {}: score {}",
                path.display(),
                pair.index,
                pair_score
            );

            if pair_score.exceeds(self.threshold) {
                let frame = if self.save_full_frame { pair.first } else { first };
                sink.emit(DetectionEvent {
                    video: path.to_path_buf(),
                    frame_index: pair.index,
                    score: pair_score,
                    frame,
                })?;
                detections += 1;
            }
        }

        Ok(VideoSummary {
            path: path.to_path_buf(),
            frame_rate,
            stride: cadence.stride(),
            frames_decoded: scan.frame_count(),
            pairs_scored,
            detections,
            peak_score,
        })
    }
}
