// ============================================================================
// framewatch-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif progress bar for batch scans
//
// Implements the core BatchProgress observer with a single bar counting
// finished videos. The bar draws to stderr and hides itself when stderr is
// not a terminal.

// ---- External crate imports ----
use framewatch_core::{BatchProgress, BatchSummary, VideoOutcome};
use indicatif::{ProgressBar, ProgressStyle};

// ---- Standard library imports ----
use std::path::Path;
use std::time::Duration;

/// Progress bar over the videos of one batch.
#[derive(Clone)]
pub struct ScanProgressBar {
    bar: ProgressBar,
}

impl Default for ScanProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("  Scanning: {pos}/{len} [{bar:30}] ({elapsed} / {eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        bar.set_style(style);
        Self { bar }
    }
}

impl BatchProgress for ScanProgressBar {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.enable_steady_tick(Duration::from_millis(200));
    }

    fn on_video_start(&self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().to_string());
        }
    }

    fn on_video_finish(&self, _outcome: &VideoOutcome) {
        self.bar.inc(1);
    }

    fn on_batch_finish(&self, _summary: &BatchSummary) {
        self.bar.finish_and_clear();
    }
}
