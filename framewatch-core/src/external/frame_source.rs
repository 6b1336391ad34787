// ============================================================================
// framewatch-core/src/external/frame_source.rs
// ============================================================================
//
// FRAME SOURCE: Sequential Frame Decoding Abstraction
//
// This module defines the seam between the detection pipeline and whatever
// decodes video. The pipeline only needs a forward-only cursor over frames and
// the stream's frame rate, so it can be driven by ffmpeg in production and by
// a scripted frame list in tests.
//
// KEY COMPONENTS:
// - FrameSource: Trait representing one open video
// - SourceOpener: Trait for opening a FrameSource from a path
// - validate_frame_rate: Truncation and positivity check for reported rates

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;

use std::path::Path;

/// A forward-only cursor over the decoded frames of one video.
pub trait FrameSource {
    /// Frame rate as reported by the container, possibly fractional.
    fn reported_frame_rate(&self) -> f64;

    /// Decodes the next frame. `Ok(None)` marks end-of-stream; every call
    /// after that also returns `Ok(None)`.
    fn next_frame(&mut self) -> CoreResult<Option<Frame>>;

    /// Integer frame rate used for cadence computation.
    ///
    /// Fractional rates are truncated; rates that truncate to zero, negative
    /// rates and non-finite rates fail with `InvalidFrameRate`.
    fn frame_rate(&self) -> CoreResult<u32> {
        validate_frame_rate(self.reported_frame_rate())
    }
}

/// Opens frame sources. Shared by all workers of a batch, hence `Sync`.
pub trait SourceOpener: Sync {
    type Source: FrameSource;

    /// Opens `path`, failing with `UnreadableVideo` if it cannot be decoded.
    fn open(&self, path: &Path) -> CoreResult<Self::Source>;
}

/// Truncates a reported frame rate to a positive integer.
pub fn validate_frame_rate(rate: f64) -> CoreResult<u32> {
    if !rate.is_finite() || rate < 1.0 {
        return Err(CoreError::InvalidFrameRate { rate });
    }
    Ok(rate.trunc().min(f64::from(u32::MAX)) as u32)
}

/// Parses ffprobe-style rate strings such as `30000/1001`, `25/1` or `29.97`.
///
/// A zero denominator yields `None` rather than an infinite rate.
#[must_use]
pub fn parse_frame_rate(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().ok()?;
            let denominator: f64 = denominator.trim().parse().ok()?;
            (denominator != 0.0).then(|| numerator / denominator)
        }
        None => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_frame_rate_truncates() {
        assert_eq!(validate_frame_rate(30.0).unwrap(), 30);
        assert_eq!(validate_frame_rate(29.97).unwrap(), 29);
        assert_eq!(validate_frame_rate(1.0).unwrap(), 1);
    }

    #[test]
    fn test_validate_frame_rate_rejects_non_positive() {
        for rate in [0.0, 0.5, -25.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_frame_rate(rate), Err(CoreError::InvalidFrameRate { .. })),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate("29.97"), Some(29.97));
        assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("invalid"), None);
    }
}
