//! Sampling cadence: which decoded frame pairs get scored.

use crate::error::{CoreError, CoreResult};

/// Frame-index stride between scored pairs, derived once per video from the
/// configured interval and that video's frame rate.
///
/// The decode counter only ever holds even values when a pair completes, so
/// an odd stride effectively samples every `2 * stride` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingCadence {
    stride: u64,
}

impl SamplingCadence {
    pub fn new(interval_secs: u32, frame_rate: u32) -> CoreResult<Self> {
        let stride = u64::from(interval_secs) * u64::from(frame_rate);
        if stride == 0 {
            return Err(CoreError::Config(format!(
                "sampling stride must be positive (interval {interval_secs}s at {frame_rate} fps)"
            )));
        }
        Ok(Self { stride })
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// True when a pair completing at `frame_count` decoded frames is scored.
    #[must_use]
    pub fn is_sampled(&self, frame_count: u64) -> bool {
        frame_count > 0 && frame_count % self.stride == 0
    }
}
