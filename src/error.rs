//! Error types for the `reloop` crate.
//!
//! This module defines [`ReloopError`], the unified error type returned by all
//! fallible operations in the crate. Variants carry enough context (paths,
//! durations, rejected values) to diagnose a failed conversion without extra
//! logging at the call site.
//!
//! Per-frame seek timeouts are deliberately **absent** from this taxonomy:
//! a seek that overruns its deadline is absorbed by the sampler (the previous
//! presented frame is reused) and only counted in
//! [`SampleStats`](crate::SampleStats).

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `reloop` operations.
///
/// Every public method that can fail returns `Result<T, ReloopError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReloopError {
    /// The source clip could not be opened or probed.
    ///
    /// This is the "clip never became playable" failure: the conversion is
    /// aborted and no container is produced.
    #[error("Failed to open clip at {path}: {reason}")]
    ClipOpen {
        /// Path or URL that was passed to [`crate::ClipInfo::probe`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The source contains no video stream to sample from.
    #[error("No video stream found in clip")]
    NoVideoStream,

    /// Pixel data could not be read because the remote source refused access.
    ///
    /// Distinct from [`ClipOpen`](ReloopError::ClipOpen) so callers can
    /// surface an actionable message (credentials / access policy) instead of
    /// a generic open failure. Mapped from HTTP 401/403 responses.
    #[error("Pixel access to {path} denied by the remote source: {reason}")]
    PixelAccessDenied {
        /// Path or URL of the refused source.
        path: PathBuf,
        /// Underlying transport-level reason.
        reason: String,
    },

    /// The clip was opened but never presented a single frame.
    ///
    /// Raised when the priming wait (bounded by
    /// [`ConvertOptions::with_load_timeout`](crate::ConvertOptions::with_load_timeout))
    /// elapses with nothing decoded. Sampling never produced usable frames,
    /// so the conversion is aborted.
    #[error("Clip never presented a frame (waited {waited:?})")]
    ClipStalled {
        /// How long the sampler waited for the first presentation.
        waited: Duration,
    },

    /// The sample plan derives zero frames, so there is nothing to encode.
    #[error("Clip of duration {duration:?} yields no frames at {frame_rate} fps")]
    EmptyClip {
        /// Probed clip duration.
        duration: Duration,
        /// Configured sampling frame rate.
        frame_rate: u32,
    },

    /// A video frame could not be decoded or converted to RGBA.
    #[error("Failed to decode clip frame: {0}")]
    ClipDecode(String),

    /// The target width is outside the representable range.
    ///
    /// GIF dimensions are 16-bit; widths of 0 or above 65535 are rejected.
    #[error("Invalid target width {0} (expected 1..=65535)")]
    InvalidTargetWidth(u32),

    /// The sampling frame rate is outside the representable range.
    ///
    /// GIF frame delays are whole centiseconds, so rates above 100 fps
    /// cannot be expressed.
    #[error("Invalid frame rate {0} fps (expected 1..=100)")]
    InvalidFrameRate(u32),

    /// The requested palette size exceeds the format's hard ceiling.
    #[error("Invalid palette size {0} (expected 2..=256)")]
    InvalidPaletteSize(u16),

    /// The quantizer sampling speed is outside NeuQuant's accepted range.
    #[error("Invalid quantizer speed {0} (expected 1..=30)")]
    InvalidQuantizerSpeed(i32),

    /// GIF container assembly failed.
    ///
    /// The assembler trusts well-formed indexed frames, so this class of
    /// failure indicates a programming error rather than bad input; it is
    /// never retried.
    #[error("GIF encoding error: {0}")]
    GifEncode(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// A background conversion task failed to complete.
    #[cfg(feature = "async")]
    #[error("Background conversion task failed: {0}")]
    TaskJoin(String),
}

impl From<FfmpegError> for ReloopError {
    fn from(error: FfmpegError) -> Self {
        ReloopError::FfmpegError(error.to_string())
    }
}

/// Returns `true` if an FFmpeg-level open/read failure means the remote
/// source refused access rather than being absent or malformed.
pub(crate) fn is_access_denied(error: &FfmpegError) -> bool {
    matches!(
        error,
        FfmpegError::HttpUnauthorized | FfmpegError::HttpForbidden
    )
}
