//! Conversion configuration.
//!
//! [`ConvertOptions`] is a builder carrying everything a conversion run can
//! vary: output geometry, sampling rate, palette and quantizer settings,
//! seek/load deadlines, repeat behavior, and progress reporting. Every field
//! has a documented default, so `ConvertOptions::new()` reproduces the stock
//! word-art-style output (400 px wide, 10 fps, 256 colors, endless loop).
//!
//! # Example
//!
//! ```no_run
//! use reloop::ConvertOptions;
//!
//! let options = ConvertOptions::new()
//!     .with_target_width(320)
//!     .with_frame_rate(12)
//!     .with_palette_size(128);
//!
//! let output = reloop::convert("clip.mp4", &options)?;
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ReloopError;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Default output width in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 400;

/// Default sampling frame rate in frames per second.
pub const DEFAULT_FRAME_RATE: u32 = 10;

/// Default palette size — the GIF format's hard ceiling.
pub const DEFAULT_PALETTE_SIZE: u16 = 256;

/// Default NeuQuant sampling factor (1 = best quality, 30 = fastest).
pub const DEFAULT_QUANTIZER_SPEED: i32 = 10;

/// Default per-frame seek deadline.
pub const DEFAULT_SEEK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default deadline for the clip to present its first frame.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one conversion run.
///
/// Build with [`ConvertOptions::new`] and the `with_*` methods. Options are
/// validated once at conversion entry; see [`ConvertOptions::validate`].
#[derive(Clone)]
pub struct ConvertOptions {
    pub(crate) target_width: u32,
    pub(crate) frame_rate: u32,
    pub(crate) palette_size: u16,
    pub(crate) quantizer_speed: i32,
    pub(crate) seek_timeout: Duration,
    pub(crate) load_timeout: Duration,
    /// `None` means loop forever.
    pub(crate) repeat: Option<u16>,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) progress_batch: u64,
}

impl Debug for ConvertOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConvertOptions")
            .field("target_width", &self.target_width)
            .field("frame_rate", &self.frame_rate)
            .field("palette_size", &self.palette_size)
            .field("quantizer_speed", &self.quantizer_speed)
            .field("seek_timeout", &self.seek_timeout)
            .field("load_timeout", &self.load_timeout)
            .field("repeat", &self.repeat)
            .field("progress_batch", &self.progress_batch)
            .finish_non_exhaustive()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// Create options with the documented defaults.
    pub fn new() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            frame_rate: DEFAULT_FRAME_RATE,
            palette_size: DEFAULT_PALETTE_SIZE,
            quantizer_speed: DEFAULT_QUANTIZER_SPEED,
            seek_timeout: DEFAULT_SEEK_TIMEOUT,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            repeat: None,
            progress: Arc::new(NoOpProgress),
            progress_batch: 1,
        }
    }

    /// Set the output width in pixels. Height is derived to preserve the
    /// source aspect ratio, rounded down to an even number.
    #[must_use]
    pub fn with_target_width(mut self, width: u32) -> Self {
        self.target_width = width;
        self
    }

    /// Set the sampling frame rate in frames per second.
    ///
    /// Also fixes the per-frame delay: every frame is displayed for
    /// `1000 / fps` milliseconds.
    #[must_use]
    pub fn with_frame_rate(mut self, frames_per_second: u32) -> Self {
        self.frame_rate = frames_per_second;
        self
    }

    /// Set the per-frame palette size (2..=256).
    #[must_use]
    pub fn with_palette_size(mut self, colors: u16) -> Self {
        self.palette_size = colors;
        self
    }

    /// Set the NeuQuant sampling factor (1 = best quality, 30 = fastest).
    #[must_use]
    pub fn with_quantizer_speed(mut self, speed: i32) -> Self {
        self.quantizer_speed = speed;
        self
    }

    /// Set the per-frame seek deadline.
    ///
    /// A seek that misses the deadline is absorbed: the previous presented
    /// frame is reused and the timeout is counted, never raised as an error.
    #[must_use]
    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.seek_timeout = timeout;
        self
    }

    /// Set the deadline for the clip to present its first frame.
    ///
    /// Missing this deadline fails the whole conversion with
    /// [`ReloopError::ClipStalled`].
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Set how many times the GIF repeats. `None` means loop forever
    /// (the default).
    #[must_use]
    pub fn with_repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Fire the progress callback every `batch` frames (clamped to ≥ 1).
    #[must_use]
    pub fn with_progress_batch(mut self, batch: u64) -> Self {
        self.progress_batch = batch.max(1);
        self
    }

    /// Check every option against its accepted range.
    ///
    /// Called by the conversion entry points before any decoding starts.
    ///
    /// # Errors
    ///
    /// - [`ReloopError::InvalidTargetWidth`] unless width is 1..=65535.
    /// - [`ReloopError::InvalidFrameRate`] unless the rate is 1..=100
    ///   (GIF delays are whole centiseconds).
    /// - [`ReloopError::InvalidPaletteSize`] unless the size is 2..=256.
    /// - [`ReloopError::InvalidQuantizerSpeed`] unless the speed is 1..=30.
    pub fn validate(&self) -> Result<(), ReloopError> {
        if self.target_width == 0 || self.target_width > u32::from(u16::MAX) {
            return Err(ReloopError::InvalidTargetWidth(self.target_width));
        }
        if self.frame_rate == 0 || self.frame_rate > 100 {
            return Err(ReloopError::InvalidFrameRate(self.frame_rate));
        }
        if self.palette_size < 2 || self.palette_size > 256 {
            return Err(ReloopError::InvalidPaletteSize(self.palette_size));
        }
        if self.quantizer_speed < 1 || self.quantizer_speed > 30 {
            return Err(ReloopError::InvalidQuantizerSpeed(self.quantizer_speed));
        }
        Ok(())
    }
}
