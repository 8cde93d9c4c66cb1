//! Source clip probing.
//!
//! [`ClipInfo`] captures the intrinsic properties of a playable video
//! resource — duration, dimensions, frame rate — in a single open/probe pass.
//! It is the immutable input from which a [`SamplePlan`](crate::SamplePlan)
//! is derived, and the point where the two fatal input failures are raised:
//! an unplayable source ([`ReloopError::ClipOpen`]) and a source that refuses
//! pixel access ([`ReloopError::PixelAccessDenied`]).
//!
//! # Example
//!
//! ```no_run
//! use reloop::ClipInfo;
//!
//! let clip = ClipInfo::probe("input.mp4")?;
//! println!("{}x{} @ {:.1} fps, {:?}", clip.width, clip.height,
//!     clip.frames_per_second, clip.duration);
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, media::Type};

use crate::error::{ReloopError, is_access_denied};

/// Probed metadata for one source clip.
///
/// Produced by [`ClipInfo::probe`]; immutable for the duration of a
/// conversion. The probe opens its own demuxer and drops it before
/// returning — the decode worker spawned later opens a fresh one, so each
/// conversion owns its media handle outright.
#[derive(Debug, Clone)]
pub struct ClipInfo {
    /// Path or URL of the source.
    pub source: PathBuf,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Average frames per second reported by the container.
    pub frames_per_second: f64,
    /// Container-level duration.
    pub duration: Duration,
    /// Name of the video codec, or `"unknown"`.
    pub codec: String,
}

impl ClipInfo {
    /// Open a clip and probe its video stream.
    ///
    /// Initializes FFmpeg (idempotent), opens the source, locates the best
    /// video stream, and reads its parameters. The demuxer context is
    /// discarded before returning.
    ///
    /// # Errors
    ///
    /// - [`ReloopError::ClipOpen`] if the source cannot be opened or its
    ///   codec parameters cannot be read.
    /// - [`ReloopError::PixelAccessDenied`] if a remote source answers with
    ///   an authorization failure.
    /// - [`ReloopError::NoVideoStream`] if the source has no video stream.
    pub fn probe<P: AsRef<Path>>(source: P) -> Result<Self, ReloopError> {
        let path = source.as_ref().to_path_buf();

        ffmpeg_next::init().map_err(|error| ReloopError::ClipOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_failure(&path, &error))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ReloopError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let stream = input_context
            .stream(video_stream_index)
            .ok_or(ReloopError::NoVideoStream)?;
        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                ReloopError::ClipOpen {
                    path: path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| ReloopError::ClipOpen {
                path: path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        log::debug!(
            "Probed clip {path:?}: {width}x{height} @ {frames_per_second:.2} fps, \
             duration {duration:?}, codec {codec}",
        );

        Ok(Self {
            source: path,
            width,
            height,
            frames_per_second,
            duration,
            codec,
        })
    }

    /// Run preflight checks over the probed metadata.
    ///
    /// Does not re-read the source. See
    /// [`ValidationReport`](crate::ValidationReport) for the report shape.
    pub fn validate(&self) -> crate::validation::ValidationReport {
        crate::validation::validate_clip(self)
    }
}

/// Map an FFmpeg open error to the right fatal variant.
fn open_failure(path: &Path, error: &ffmpeg_next::Error) -> ReloopError {
    if is_access_denied(error) {
        ReloopError::PixelAccessDenied {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    } else {
        ReloopError::ClipOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    }
}
