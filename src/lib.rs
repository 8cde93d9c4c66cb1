//! # reloop
//!
//! Convert short video clips into looping animated GIFs.
//!
//! `reloop` samples a clip at a fixed frame rate, quantizes each frame to its
//! own ≤256-color palette, and assembles the result into a single GIF89a
//! byte sequence that loops forever — the classic "turn this generated clip
//! into something you can drop in a chat" pipeline, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ### Convert a clip
//!
//! ```no_run
//! use reloop::ConvertOptions;
//!
//! let output = reloop::convert("clip.mp4", &ConvertOptions::new()).unwrap();
//! output.save("clip.gif").unwrap();
//! ```
//!
//! ### Tune the plan
//!
//! ```no_run
//! use reloop::ConvertOptions;
//!
//! let options = ConvertOptions::new()
//!     .with_target_width(320)     // height derives, forced to an even number
//!     .with_frame_rate(12)        // 12 sampled frames per second of clip
//!     .with_palette_size(128);    // colors per frame
//!
//! let output = reloop::convert_to_file("clip.mp4", "clip.gif", &options).unwrap();
//! println!("{} frames, {} timeouts absorbed", output.frame_count, output.seek_timeouts);
//! ```
//!
//! ## How a conversion runs
//!
//! Probing the clip yields a [`ClipInfo`]; from it and the options a
//! [`SamplePlan`] is derived once — output dimensions (aspect-preserving,
//! even height), frame rate, total frame count `floor(duration × fps)`, and
//! the constant per-frame delay. A decode worker then presents frames at the
//! plan's timestamps while the pipeline interleaves, per frame: sample →
//! quantize → append. Nothing buffers more than one raw frame.
//!
//! Seeking is raced against a deadline: a seek that misses it contributes a
//! duplicate of the previous frame rather than a gap, so the container always
//! holds exactly the planned frame count. The absorbed timeouts are counted
//! in [`GifOutput::seek_timeouts`].
//!
//! ## Errors
//!
//! All fallible operations return [`ReloopError`]. A clip that never becomes
//! playable fails the whole conversion; a remote source refusing pixel access
//! is reported distinctly ([`ReloopError::PixelAccessDenied`]) so callers can
//! show an actionable message. Per-frame seek timeouts are never errors.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | [`convert_async`] — conversion as a future via Tokio |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod clip;
pub mod config;
pub mod convert;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod gif;
pub mod plan;
pub mod progress;
pub mod quantize;
pub mod sampler;
pub mod source;
#[cfg(feature = "async")]
pub mod stream;
mod util;
pub mod validation;

pub use clip::ClipInfo;
pub use config::{
    ConvertOptions, DEFAULT_FRAME_RATE, DEFAULT_LOAD_TIMEOUT, DEFAULT_PALETTE_SIZE,
    DEFAULT_QUANTIZER_SPEED, DEFAULT_SEEK_TIMEOUT, DEFAULT_TARGET_WIDTH,
};
pub use convert::{convert, convert_source, convert_to_file};
pub use error::ReloopError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frame::IndexedFrame;
pub use crate::gif::{GIF_MIME, GifAssembler, GifOutput};
pub use plan::SamplePlan;
pub use progress::{ConvertStage, ProgressCallback, ProgressInfo};
pub use quantize::quantize;
pub use sampler::{FrameSampler, SampleStats};
pub use source::{ClipDecoder, FrameSource};
#[cfg(feature = "async")]
pub use stream::{GifFuture, convert_async};
pub use validation::ValidationReport;
