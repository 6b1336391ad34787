// ============================================================================
// framewatch-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for DetectionConfig
//
// Provides a fluent API for creating DetectionConfig instances. Every field
// starts from its default, so callers only set what differs.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::DetectionConfig;

/// Builder for creating DetectionConfig instances.
///
/// # Examples
///
/// ```rust
/// use framewatch_core::config::DetectionConfigBuilder;
///
/// let config = DetectionConfigBuilder::new()
///     .interval_secs(2)
///     .blur_size(3)
///     .workers(4)
///     .build();
/// assert_eq!(config.interval_secs, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Sets the directory scanned for videos.
    pub fn input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = input_dir.into();
        self
    }

    /// Sets the directory receiving detection images.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Sets the mask image path.
    pub fn mask_path(mut self, mask_path: impl Into<PathBuf>) -> Self {
        self.config.mask_path = mask_path.into();
        self
    }

    /// Sets the accepted video container extension.
    pub fn video_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.video_extension = extension.into();
        self
    }

    /// Sets the number of seconds between sampled pairs.
    pub fn interval_secs(mut self, seconds: u32) -> Self {
        self.config.interval_secs = seconds;
        self
    }

    /// Sets the score a pair must strictly exceed to be reported.
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Sets the median neighborhood size.
    pub fn blur_size(mut self, size: u32) -> Self {
        self.config.blur_size = size;
        self
    }

    /// Sets the fraction of rows removed from the top of each frame.
    pub fn crop_fraction(mut self, fraction: f64) -> Self {
        self.config.crop_fraction = fraction;
        self
    }

    /// Sets the output image extension.
    pub fn image_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.image_extension = extension.into();
        self
    }

    pub fn save_full_frame(mut self, enable: bool) -> Self {
        self.config.save_full_frame = enable;
        self
    }

    /// Sets the worker count; 0 selects one worker per CPU.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Finishes the builder. Call [`DetectionConfig::validate`] before use.
    pub fn build(self) -> DetectionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_only_what_is_set() {
        let config = DetectionConfigBuilder::new()
            .mask_path("gate.png")
            .threshold(10)
            .build();
        let defaults = DetectionConfig::default();

        assert_eq!(config.mask_path, PathBuf::from("gate.png"));
        assert_eq!(config.threshold, 10);
        assert_eq!(config.blur_size, defaults.blur_size);
        assert_eq!(config.output_dir, defaults.output_dir);
    }
}
