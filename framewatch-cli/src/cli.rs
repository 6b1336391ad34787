// framewatch-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Framewatch: sparse motion detection for recorded video",
    long_about = "Scans a directory of videos, compares frame pairs sampled every few seconds \
                  inside a masked region, and saves a still image wherever motion was detected."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace); overrides --verbose
    #[arg(long, global = true, value_name = "LEVEL", env = "FRAMEWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scans videos for motion and writes one image per detection
    Scan(ScanArgs),
}

#[derive(Parser, Debug, Default)]
pub struct ScanArgs {
    /// Video file or directory of videos (default: ./videos)
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH")]
    pub input_path: Option<PathBuf>,

    /// Directory receiving detection images (default: ./output_all_images)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Mask image matching the size of the cropped region (default: ./mask.jpg)
    #[arg(short, long, value_name = "MASK")]
    pub mask: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG", env = "FRAMEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Optional: Directory for a scan log file
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    // --- Detection Overrides ---
    /// Seconds of video between sampled frame pairs
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: Option<u32>,

    /// Score a pair must exceed to count as motion
    #[arg(short, long, value_name = "SCORE")]
    pub threshold: Option<u64>,

    /// Median blur neighborhood size (odd)
    #[arg(long, value_name = "SIZE")]
    pub blur: Option<u32>,

    /// Fraction of rows removed from the top of each frame
    #[arg(long, value_name = "FRACTION")]
    pub crop_fraction: Option<f64>,

    /// Video container extension to scan for
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Output image format (jpg, png or bmp)
    #[arg(long, value_name = "EXT")]
    pub image_extension: Option<String>,

    /// Save the whole first frame instead of the cropped region
    #[arg(long)]
    pub save_full_frame: bool,

    /// Number of videos processed in parallel (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}
