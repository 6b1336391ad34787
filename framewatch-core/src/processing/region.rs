//! Region of interest cropping and the static inclusion mask.
//!
//! Only the lower part of each frame is compared. The crop removes a fixed
//! fraction of rows from the top (rounding the split row down), keeps the full
//! width, and the mask then restricts comparison to selected pixels of that
//! cropped region.

use crate::error::{CoreError, CoreResult, dimension_mismatch};
use crate::frame::{Frame, Intensity};

use image::Luma;
use image::imageops;

use std::path::Path;

/// Value stored for pixels that take part in comparison.
const INCLUDED: u8 = u8::MAX;

/// Grey level at or above which a pixel of a mask file counts as included.
const FILE_INCLUDE_LEVEL: u8 = 128;

/// The bottom part of a frame, selected by dropping `crop_fraction` of the rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionOfInterest {
    crop_fraction: f64,
}

impl RegionOfInterest {
    pub fn new(crop_fraction: f64) -> Self {
        Self { crop_fraction }
    }

    /// Index of the first kept row for a frame of the given height.
    #[must_use]
    pub fn split_row(&self, height: u32) -> u32 {
        let split = (f64::from(height) * self.crop_fraction).floor();
        (split.max(0.0) as u32).min(height)
    }

    /// Size of the cropped region for a frame of the given size.
    #[must_use]
    pub fn cropped_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width, height - self.split_row(height))
    }

    /// Copies the region out of `frame`. Pure: the same frame always yields
    /// the same region.
    #[must_use]
    pub fn crop(&self, frame: &Frame) -> Frame {
        let (width, height) = frame.dimensions();
        let split = self.split_row(height);
        imageops::crop_imm(frame, 0, split, width, height - split).to_image()
    }
}

/// A binary per-pixel inclusion filter for the cropped region.
///
/// Loaded once and shared read-only between every comparison and every
/// worker. Excluded pixels are stored as 0, included pixels as 255.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pixels: Intensity,
}

impl Mask {
    /// Loads a mask image from disk, converting it to a single channel.
    ///
    /// Pixels at or above mid-grey are included, which keeps lossy JPEG masks
    /// close to the hand-painted original.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::MissingMask {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }

        let image = image::open(path).map_err(|e| CoreError::MissingMask {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut pixels = image.to_luma8();
        for pixel in pixels.pixels_mut() {
            pixel.0[0] = if pixel.0[0] >= FILE_INCLUDE_LEVEL { INCLUDED } else { 0 };
        }

        let mask = Self { pixels };
        log::debug!(
            "Loaded mask {} ({}x{}, {} included pixels)",
            path.display(),
            mask.width(),
            mask.height(),
            mask.included_pixels()
        );
        Ok(mask)
    }

    /// Builds a mask from an in-memory intensity grid; any non-zero value is
    /// included.
    pub fn from_image(image: &Intensity) -> Self {
        let pixels = Intensity::from_fn(image.width(), image.height(), |x, y| {
            Luma([if image.get_pixel(x, y).0[0] > 0 { INCLUDED } else { 0 }])
        });
        Self { pixels }
    }

    /// A mask including every pixel of a `width` x `height` region.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            pixels: Intensity::from_pixel(width, height, Luma([INCLUDED])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn included_pixels(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[0] != 0).count()
    }

    /// Fails with `DimensionMismatch` unless the mask covers exactly a region
    /// of `(width, height)`.
    pub fn check_dimensions(&self, region: (u32, u32)) -> CoreResult<()> {
        if self.dimensions() != region {
            return Err(dimension_mismatch(
                "mask vs cropped region",
                self.dimensions(),
                region,
            ));
        }
        Ok(())
    }

    /// Zeroes every pixel of `gray` the mask excludes. Included pixels are
    /// left untouched, so applying the same mask twice changes nothing.
    pub fn apply(&self, gray: &mut Intensity) -> CoreResult<()> {
        self.check_dimensions(gray.dimensions())?;
        for (pixel, keep) in gray.pixels_mut().zip(self.pixels.pixels()) {
            if keep.0[0] == 0 {
                pixel.0[0] = 0;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn striped_frame(width: u32, height: u32) -> Frame {
        Frame::from_fn(width, height, |_, y| Rgb([y as u8, 0, 0]))
    }

    #[test]
    fn test_crop_keeps_bottom_half_rounding_down() {
        let region = RegionOfInterest::new(0.5);
        for height in [1, 2, 7, 240, 481] {
            let cropped = region.crop(&striped_frame(10, height));
            assert_eq!(cropped.height(), height - height / 2);
            assert_eq!(cropped.width(), 10);
        }

        let cropped = region.crop(&striped_frame(4, 7));
        // Split row is floor(3.5) = 3, so the first kept row is row 3.
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([3, 0, 0]));
        assert_eq!(cropped.get_pixel(0, 3), &Rgb([6, 0, 0]));
    }

    #[test]
    fn test_crop_is_deterministic() {
        let region = RegionOfInterest::new(0.5);
        let frame = striped_frame(16, 9);
        assert_eq!(region.crop(&frame), region.crop(&frame));
    }

    #[test]
    fn test_zero_fraction_keeps_whole_frame() {
        let region = RegionOfInterest::new(0.0);
        let frame = striped_frame(5, 5);
        assert_eq!(region.crop(&frame), frame);
    }

    #[test]
    fn test_mask_apply_is_idempotent() {
        let mask = Mask::from_image(&Intensity::from_fn(4, 4, |x, _| Luma([(x % 2) as u8 * 9])));
        let mut gray = Intensity::from_fn(4, 4, |x, y| Luma([(x * 10 + y) as u8 + 1]));

        mask.apply(&mut gray).unwrap();
        let once = gray.clone();
        mask.apply(&mut gray).unwrap();

        assert_eq!(gray, once);
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(1, 2).0[0], 13);
    }

    #[test]
    fn test_mask_dimension_mismatch() {
        let mask = Mask::filled(320, 120);
        let mut gray = Intensity::new(320, 240);
        assert!(matches!(
            mask.apply(&mut gray),
            Err(CoreError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_load_missing_mask() {
        let result = Mask::load(Path::new("/nonexistent/framewatch/mask.jpg"));
        assert!(matches!(result, Err(CoreError::MissingMask { .. })));
    }

    #[test]
    fn test_load_binarizes_file_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        Intensity::from_fn(3, 1, |x, _| Luma([[0, 127, 200][x as usize]]))
            .save(&path)
            .unwrap();

        let mask = Mask::load(&path).unwrap();
        assert_eq!(mask.dimensions(), (3, 1));
        assert_eq!(mask.included_pixels(), 1);
    }
}
