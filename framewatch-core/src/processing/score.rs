//! Motion score: the summed absolute intensity difference of two grids.

use crate::error::{CoreResult, dimension_mismatch};
use crate::frame::Intensity;

use std::fmt;

/// Aggregate magnitude of change between two normalized frames.
///
/// Unbounded above; it scales with the region's pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MotionScore(pub u64);

impl MotionScore {
    pub fn value(self) -> u64 {
        self.0
    }

    /// Strict comparison: a score equal to the threshold does not count.
    #[must_use]
    pub fn exceeds(self, threshold: u64) -> bool {
        self.0 > threshold
    }
}

impl fmt::Display for MotionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sums `|a - b|` over every pixel. Symmetric in its arguments.
pub fn score(a: &Intensity, b: &Intensity) -> CoreResult<MotionScore> {
    if a.dimensions() != b.dimensions() {
        return Err(dimension_mismatch(
            "frame pair",
            a.dimensions(),
            b.dimensions(),
        ));
    }

    let total = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();
    Ok(MotionScore(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use image::Luma;

    #[test]
    fn test_score_sums_absolute_differences() {
        let a = Intensity::from_fn(3, 2, |x, y| Luma([(x * 40 + y * 5) as u8]));
        let b = Intensity::from_pixel(3, 2, Luma([50]));
        // a = [0, 40, 80; 5, 45, 85] -> |a - 50| = 50+10+30+45+5+35
        assert_eq!(score(&a, &b).unwrap(), MotionScore(175));
        assert_eq!(score(&a, &b).unwrap(), score(&b, &a).unwrap());
    }

    #[test]
    fn test_identical_grids_score_zero() {
        let a = Intensity::from_pixel(16, 16, Luma([99]));
        assert_eq!(score(&a, &a.clone()).unwrap(), MotionScore(0));
    }

    #[test]
    fn test_mismatched_grids_fail() {
        let a = Intensity::new(4, 4);
        let b = Intensity::new(4, 5);
        assert!(matches!(score(&a, &b), Err(CoreError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_exceeds_is_strict() {
        assert!(!MotionScore(50_000).exceeds(50_000));
        assert!(MotionScore(50_001).exceeds(50_000));
    }
}
