// ============================================================================
// framewatch-core/src/batch.rs
// ============================================================================
//
// BATCH PROCESSING: Running the Detection Pipeline over Many Videos
//
// The pipeline itself knows nothing about concurrency. This module submits one
// task per video to a dedicated rayon pool, collects one outcome per task and
// reports progress through the BatchProgress observer. Failures (including
// panics) are confined to the video that caused them.
//
// KEY COMPONENTS:
// - BatchProgress / NullBatchProgress: progress observer
// - BatchRunner: task distribution over a sized worker pool
// - VideoOutcome / BatchSummary: per-video results and their aggregate
// - process_videos: mask loading plus a full batch run

// ---- Internal crate imports ----
use crate::config::{DetectionConfig, resolve_workers};
use crate::error::{CoreError, CoreResult};
use crate::external::SourceOpener;
use crate::output::DetectionSink;
use crate::processing::pipeline::{DetectionPipeline, VideoSummary};
use crate::processing::region::Mask;

// ---- External crate imports ----
use log::{error, info, warn};
use rayon::prelude::*;

// ---- Standard library imports ----
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// PROGRESS OBSERVER
// ============================================================================

/// Receives batch progress notifications. Called from worker threads.
pub trait BatchProgress: Send + Sync {
    fn on_batch_start(&self, _total: usize) {}

    fn on_video_start(&self, _path: &Path) {}

    fn on_video_finish(&self, _outcome: &VideoOutcome) {}

    fn on_batch_finish(&self, _summary: &BatchSummary) {}
}

/// Progress observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBatchProgress;

impl BatchProgress for NullBatchProgress {}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Result of one video's task.
#[derive(Debug)]
pub struct VideoOutcome {
    pub path: PathBuf,
    pub result: CoreResult<VideoSummary>,
    pub elapsed: Duration,
}

impl VideoOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Detections emitted for this video; zero on failure.
    pub fn detections(&self) -> u64 {
        self.result.as_ref().map_or(0, |summary| summary.detections)
    }

    pub fn error(&self) -> Option<&CoreError> {
        self.result.as_ref().err()
    }
}

/// Aggregate of a finished batch. Outcomes are in input order.
#[derive(Debug)]
pub struct BatchSummary {
    pub outcomes: Vec<VideoOutcome>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn total_detections(&self) -> u64 {
        self.outcomes.iter().map(VideoOutcome::detections).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Failed videos with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &CoreError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.path.as_path(), e)))
    }
}

// ============================================================================
// BATCH RUNNER
// ============================================================================

/// Distributes one task per video over a worker pool of fixed size.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    workers: usize,
}

impl BatchRunner {
    /// A runner with `workers` threads; 0 selects one per CPU.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: resolve_workers(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `task` once per file and returns the outcomes in input order.
    ///
    /// Only failing to build the pool is an error; task errors and panics are
    /// recorded in the corresponding outcome.
    pub fn run<T, P>(
        &self,
        files: &[PathBuf],
        progress: &P,
        task: T,
    ) -> CoreResult<Vec<VideoOutcome>>
    where
        T: Fn(&Path) -> CoreResult<VideoSummary> + Sync,
        P: BatchProgress + ?Sized,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("framewatch-worker-{i}"))
            .build()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to build worker pool: {e}")))?;

        info!(
            "Processing {} video(s) with {} worker(s)",
            files.len(),
            self.workers
        );
        progress.on_batch_start(files.len());

        let outcomes: Vec<VideoOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    progress.on_video_start(path);
                    let start = Instant::now();
                    let result = run_isolated(path, &task);
                    if let Err(e) = &result {
                        error!("Failed to process {}: {}", path.display(), e);
                    }
                    let outcome = VideoOutcome {
                        path: path.clone(),
                        result,
                        elapsed: start.elapsed(),
                    };
                    progress.on_video_finish(&outcome);
                    outcome
                })
                .collect()
        });

        Ok(outcomes)
    }
}

/// Runs one task, turning a panic into an `OperationFailed` error.
fn run_isolated<T>(path: &Path, task: &T) -> CoreResult<VideoSummary>
where
    T: Fn(&Path) -> CoreResult<VideoSummary>,
{
    panic::catch_unwind(AssertUnwindSafe(|| task(path))).unwrap_or_else(|payload| {
        Err(CoreError::OperationFailed(format!(
            "worker panicked while processing {}: {}",
            path.display(),
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// BATCH ENTRY POINT
// ============================================================================

/// Scans every file in `files` for motion and reports what happened.
///
/// The mask is loaded once and shared by all workers. If it cannot be loaded,
/// every video is reported as a `MissingMask` failure and no video is opened.
pub fn process_videos<O: SourceOpener>(
    opener: &O,
    sink: &dyn DetectionSink,
    config: &DetectionConfig,
    files: &[PathBuf],
    progress: &dyn BatchProgress,
) -> CoreResult<BatchSummary> {
    config.validate()?;
    let start = Instant::now();
    let runner = BatchRunner::new(config.workers);

    let outcomes = match Mask::load(&config.mask_path) {
        Ok(mask) => {
            let pipeline = DetectionPipeline::new(opener, Arc::new(mask), config);
            runner.run(files, progress, |path| pipeline.process_video(path, sink))?
        }
        Err(CoreError::MissingMask { path, reason }) => {
            warn!(
                "Mask {} unavailable ({}); every video will fail",
                path.display(),
                reason
            );
            runner.run(files, progress, |_| {
                Err(CoreError::MissingMask {
                    path: path.clone(),
                    reason: reason.clone(),
                })
            })?
        }
        Err(e) => return Err(e),
    };

    let summary = BatchSummary {
        outcomes,
        elapsed: start.elapsed(),
    };
    info!(
        "Batch finished: {} attempted, {} succeeded, {} failed, {} detection(s)",
        summary.attempted(),
        summary.succeeded(),
        summary.failed(),
        summary.total_detections()
    );
    progress.on_batch_finish(&summary);
    Ok(summary)
}
