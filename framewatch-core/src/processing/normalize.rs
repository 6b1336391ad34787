//! Frame normalization: intensity conversion, masking and smoothing.
//!
//! The order is fixed. Masking happens after the grey conversion and the
//! median filter runs after masking, so excluded pixels enter the filter as
//! zeros and shape the values at mask boundaries.

use crate::error::CoreResult;
use crate::frame::{Frame, Intensity};
use crate::processing::region::Mask;

use image::Luma;
use imageproc::filter::median_filter;

use std::sync::Arc;

/// Converts an RGB frame to intensity with BT.601 luma weights, rounded.
#[must_use]
pub fn to_intensity(frame: &Frame) -> Intensity {
    Intensity::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b] = frame.get_pixel(x, y).0;
        let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b) + 500) / 1000;
        Luma([luma as u8])
    })
}

/// Median filter over a `blur_size` x `blur_size` neighborhood. Edges are
/// handled by clamping to the nearest pixel.
#[must_use]
pub fn smooth(gray: &Intensity, blur_size: u32) -> Intensity {
    let radius = blur_size / 2;
    if radius == 0 {
        return gray.clone();
    }
    median_filter(gray, radius, radius)
}

/// Turns cropped frames into masked, smoothed intensity grids ready to score.
#[derive(Debug, Clone)]
pub struct FrameNormalizer {
    mask: Arc<Mask>,
    blur_size: u32,
}

impl FrameNormalizer {
    pub fn new(mask: Arc<Mask>, blur_size: u32) -> Self {
        Self { mask, blur_size }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Grey conversion, then mask, then median smoothing.
    ///
    /// Fails with `DimensionMismatch` if the mask does not match the region.
    pub fn normalize(&self, region: &Frame) -> CoreResult<Intensity> {
        let mut gray = to_intensity(region);
        self.mask.apply(&mut gray)?;
        Ok(smooth(&gray, self.blur_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use image::Rgb;

    #[test]
    fn test_to_intensity_weights() {
        let frame = Frame::from_fn(4, 1, |x, _| {
            Rgb(match x {
                0 => [255, 255, 255],
                1 => [255, 0, 0],
                2 => [0, 255, 0],
                _ => [0, 0, 255],
            })
        });
        let gray = to_intensity(&frame);
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 76);
        assert_eq!(gray.get_pixel(2, 0).0[0], 150);
        assert_eq!(gray.get_pixel(3, 0).0[0], 29);
    }

    #[test]
    fn test_smooth_removes_isolated_speck() {
        let mut gray = Intensity::new(9, 9);
        gray.put_pixel(4, 4, Luma([255]));
        let smoothed = smooth(&gray, 5);
        assert!(smoothed.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_mask_is_applied_before_blur() {
        // Only a two pixel wide column is included. Masked zeros outnumber it
        // in every 5x5 window, so the median erases it. Smoothing first would
        // leave the uniform 200 intact inside the column.
        let mut mask_image = Intensity::new(10, 10);
        for y in 0..10 {
            mask_image.put_pixel(4, y, Luma([255]));
            mask_image.put_pixel(5, y, Luma([255]));
        }
        let mask = Arc::new(Mask::from_image(&mask_image));
        let normalizer = FrameNormalizer::new(Arc::clone(&mask), 5);

        let frame = Frame::from_pixel(10, 10, Rgb([200, 200, 200]));
        let normalized = normalizer.normalize(&frame).unwrap();

        assert_eq!(normalized.get_pixel(4, 5).0[0], 0);
        assert_eq!(normalized.get_pixel(5, 5).0[0], 0);
        assert!(normalized.pixels().all(|p| p.0[0] == 0));

        let mut smoothed_first = smooth(&to_intensity(&frame), 5);
        mask.apply(&mut smoothed_first).unwrap();
        assert_eq!(smoothed_first.get_pixel(4, 5).0[0], 200);
        assert_ne!(normalized, smoothed_first);
    }

    #[test]
    fn test_normalize_rejects_wrong_region_size() {
        let normalizer = FrameNormalizer::new(Arc::new(Mask::filled(8, 4)), 5);
        let frame = Frame::new(8, 8);
        assert!(matches!(
            normalizer.normalize(&frame),
            Err(CoreError::DimensionMismatch { .. })
        ));
    }
}
