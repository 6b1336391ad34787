//! Pixel grid types shared by the decoding adapter and the pipeline.

use image::{GrayImage, RgbImage};

/// One decoded video frame, 8-bit RGB.
pub type Frame = RgbImage;

/// A single-channel 8-bit intensity grid produced by normalization.
pub type Intensity = GrayImage;
