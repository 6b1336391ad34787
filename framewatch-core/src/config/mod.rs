//! Configuration structures and constants for the framewatch-core library.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `FRAMEWATCH_*` environment variables. The CLI applies its own flags on top.

mod builder;
mod utils;

use crate::error::{CoreError, CoreResult};

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

pub use builder::DetectionConfigBuilder;

// Default constants

/// Seconds of video between two sampled frame pairs.
pub const DEFAULT_INTERVAL_SECS: u32 = 3;

/// Motion score a pair must strictly exceed to produce a detection.
pub const DEFAULT_THRESHOLD: u64 = 50_000;

/// Side length of the median smoothing neighborhood. Must be odd.
pub const DEFAULT_BLUR_SIZE: u32 = 5;

/// Fraction of rows removed from the top of each frame before comparison.
pub const DEFAULT_CROP_FRACTION: f64 = 0.5;

/// Container extension accepted during discovery.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Extension (and therefore format) of written detection images.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

pub const DEFAULT_INPUT_DIR: &str = "videos";
pub const DEFAULT_OUTPUT_DIR: &str = "output_all_images";
pub const DEFAULT_MASK_PATH: &str = "mask.jpg";

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "FRAMEWATCH_";

/// Main configuration structure for the framewatch-core library.
///
/// All fields have defaults, so a TOML file only needs to name the values it
/// changes.
///
/// # Examples
///
/// ```rust
/// use framewatch_core::config::DetectionConfigBuilder;
///
/// let config = DetectionConfigBuilder::new()
///     .input_dir("/srv/cameras/driveway")
///     .output_dir("/srv/cameras/detections")
///     .mask_path("/srv/cameras/driveway-mask.png")
///     .threshold(80_000)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Directory containing input video files
    pub input_dir: PathBuf,

    /// Flat directory receiving one image per detection
    pub output_dir: PathBuf,

    /// Single-channel mask image, same size as the cropped region
    pub mask_path: PathBuf,

    /// Container extension accepted during discovery (case-insensitive)
    pub video_extension: String,

    /// Seconds between sampled pairs; the frame stride is this times the frame rate
    pub interval_secs: u32,

    /// Strict lower bound a score must exceed to emit a detection
    pub threshold: u64,

    /// Median neighborhood size (odd)
    pub blur_size: u32,

    /// Fraction of rows dropped from the top, in `[0, 1)`
    pub crop_fraction: f64,

    /// Output image extension: jpg, png or bmp
    pub image_extension: String,

    /// Write the uncropped first frame instead of the cropped region
    pub save_full_frame: bool,

    /// Worker threads for the batch; 0 selects the number of CPUs
    pub workers: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mask_path: PathBuf::from(DEFAULT_MASK_PATH),
            video_extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            threshold: DEFAULT_THRESHOLD,
            blur_size: DEFAULT_BLUR_SIZE,
            crop_fraction: DEFAULT_CROP_FRACTION,
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            save_full_frame: false,
            workers: 0,
        }
    }
}

impl DetectionConfig {
    /// Parses a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        toml::from_str(text).map_err(|e| CoreError::Config(format!("Invalid TOML: {e}")))
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the effective configuration: defaults or the given file, then
    /// environment overrides.
    pub fn load(config_file: Option<&Path>) -> CoreResult<Self> {
        let mut config = match config_file {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::from_toml_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `FRAMEWATCH_*` environment variables on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        use utils::{override_path, override_string, override_value};

        override_path(&lookup, "INPUT_DIR", &mut self.input_dir);
        override_path(&lookup, "OUTPUT_DIR", &mut self.output_dir);
        override_path(&lookup, "MASK_PATH", &mut self.mask_path);
        override_string(&lookup, "VIDEO_EXTENSION", &mut self.video_extension);
        override_value(&lookup, "INTERVAL_SECS", &mut self.interval_secs);
        override_value(&lookup, "THRESHOLD", &mut self.threshold);
        override_value(&lookup, "BLUR_SIZE", &mut self.blur_size);
        override_value(&lookup, "CROP_FRACTION", &mut self.crop_fraction);
        override_string(&lookup, "IMAGE_EXTENSION", &mut self.image_extension);
        override_value(&lookup, "SAVE_FULL_FRAME", &mut self.save_full_frame);
        override_value(&lookup, "WORKERS", &mut self.workers);
    }

    /// Checks that every value is usable by the pipeline.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval_secs == 0 {
            return Err(CoreError::Config(
                "interval_secs must be at least 1".to_string(),
            ));
        }
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(CoreError::Config(format!(
                "blur_size must be a positive odd number, got {}",
                self.blur_size
            )));
        }
        if !(0.0..1.0).contains(&self.crop_fraction) {
            return Err(CoreError::Config(format!(
                "crop_fraction must be in [0, 1), got {}",
                self.crop_fraction
            )));
        }
        if self.video_extension.trim_start_matches('.').is_empty() {
            return Err(CoreError::Config(
                "video_extension must not be empty".to_string(),
            ));
        }
        self.image_format()?;
        Ok(())
    }

    /// The video extension without a leading dot.
    #[must_use]
    pub fn video_extension(&self) -> &str {
        self.video_extension.trim_start_matches('.')
    }

    /// Resolves `image_extension` to an encodable image format.
    pub fn image_format(&self) -> CoreResult<ImageFormat> {
        let ext = self.image_extension.trim_start_matches('.');
        match ImageFormat::from_extension(ext) {
            Some(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp)) => Ok(format),
            _ => Err(CoreError::Config(format!(
                "Unsupported image_extension '{}' (expected jpg, png or bmp)",
                self.image_extension
            ))),
        }
    }

    /// Number of worker threads actually used for a batch.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        resolve_workers(self.workers)
    }
}

/// Worker count for a requested value; 0 selects one per CPU.
#[must_use]
pub fn resolve_workers(workers: usize) -> usize {
    if workers == 0 {
        num_cpus::get().max(1)
    } else {
        workers
    }
}
