//! Sample plan derivation.
//!
//! A [`SamplePlan`] is the fixed set of parameters governing one conversion
//! run: output dimensions, frame rate, total frame count, and the constant
//! per-frame delay. It is computed once from probed clip metadata plus
//! options, and read-only thereafter — the sampler, quantizer, and assembler
//! all work against the same plan.

use std::time::Duration;

use crate::clip::ClipInfo;
use crate::config::ConvertOptions;
use crate::error::ReloopError;

/// The derived, fixed parameters for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    /// Output width in pixels (equals the configured target width).
    pub width: u32,
    /// Output height in pixels: aspect-preserving, rounded down to an even
    /// number (container constraint), never below 2.
    pub height: u32,
    /// Sampling frame rate in frames per second.
    pub frame_rate: u32,
    /// Total frames to sample: `floor(duration × frame_rate)`.
    pub frame_count: u64,
    /// Constant per-frame display delay in milliseconds (`1000 / frame_rate`).
    pub delay_ms: u32,
}

impl SamplePlan {
    /// Derive a plan from probed clip metadata and options.
    ///
    /// # Errors
    ///
    /// - Any option-range error from [`ConvertOptions::validate`].
    /// - [`ReloopError::EmptyClip`] if `floor(duration × fps)` is zero —
    ///   there would be nothing to encode.
    pub fn derive(clip: &ClipInfo, options: &ConvertOptions) -> Result<Self, ReloopError> {
        options.validate()?;

        let width = options.target_width;
        let height = derive_even_height(clip.width, clip.height, width);

        let frame_rate = options.frame_rate;
        let frame_count =
            (clip.duration.as_secs_f64() * f64::from(frame_rate)).floor() as u64;
        if frame_count == 0 {
            return Err(ReloopError::EmptyClip {
                duration: clip.duration,
                frame_rate,
            });
        }

        Ok(Self {
            width,
            height,
            frame_rate,
            frame_count,
            delay_ms: 1000 / frame_rate,
        })
    }

    /// The clip timestamp at which frame `index` is sampled.
    pub fn timestamp_for(&self, index: u64) -> Duration {
        Duration::from_secs_f64(index as f64 / f64::from(self.frame_rate))
    }
}

/// Scale the source height to the target width preserving aspect ratio, then
/// force the result down to an even number (minimum 2).
fn derive_even_height(source_width: u32, source_height: u32, target_width: u32) -> u32 {
    let scaled = if source_width > 0 {
        (u64::from(source_height) * u64::from(target_width) / u64::from(source_width)) as u32
    } else {
        source_height
    };
    (scaled & !1).max(2)
}
