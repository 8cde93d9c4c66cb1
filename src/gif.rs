//! Animated GIF container assembly.
//!
//! [`GifAssembler`] accumulates quantized frames into a single GIF89a byte
//! sequence: frames are appended one at a time in display order, each
//! carrying its own local palette and delay, and [`finish`](GifAssembler::finish)
//! writes the trailer and yields the finalized writer. Frames are never
//! reordered or dropped.
//!
//! [`GifOutput`] wraps the finalized bytes together with the container's
//! MIME type and a download-filename helper.
//!
//! # Example
//!
//! ```no_run
//! use reloop::{ConvertOptions, GIF_MIME};
//!
//! let output = reloop::convert("clip.mp4", &ConvertOptions::new())?;
//! assert_eq!(output.mime_type(), GIF_MIME);
//! output.save(output.suggested_filename("word-art"))?;
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use gif::{Encoder, Frame, Repeat};

use crate::error::ReloopError;
use crate::frame::IndexedFrame;

/// MIME type of the produced container.
pub const GIF_MIME: &str = "image/gif";

/// Incremental GIF container writer.
///
/// Created with the output dimensions and repeat behavior; the underlying
/// encoder writes the logical screen descriptor and the Netscape looping
/// extension up front, then one image block per appended frame.
pub struct GifAssembler<W: Write> {
    encoder: Encoder<W>,
    frames_written: u64,
}

impl GifAssembler<Vec<u8>> {
    /// Create an assembler that writes the container into memory.
    ///
    /// `repeat` follows [`ConvertOptions::with_repeat`](crate::ConvertOptions::with_repeat):
    /// `None` loops forever.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::GifEncode`] if the container header cannot be
    /// written.
    pub fn in_memory(
        width: u32,
        height: u32,
        repeat: Option<u16>,
    ) -> Result<Self, ReloopError> {
        Self::over(Vec::new(), width, height, repeat)
    }
}

impl GifAssembler<File> {
    /// Create an assembler that writes the container directly to a file.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::Io`] if the file cannot be created, or
    /// [`ReloopError::GifEncode`] if the container header cannot be written.
    pub fn to_file<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        repeat: Option<u16>,
    ) -> Result<Self, ReloopError> {
        let file = File::create(path.as_ref())?;
        Self::over(file, width, height, repeat)
    }
}

impl<W: Write> GifAssembler<W> {
    /// Create an assembler over an arbitrary writer.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::GifEncode`] if the container header cannot be
    /// written.
    pub fn over(
        writer: W,
        width: u32,
        height: u32,
        repeat: Option<u16>,
    ) -> Result<Self, ReloopError> {
        let mut encoder = Encoder::new(writer, width as u16, height as u16, &[])
            .map_err(|e| ReloopError::GifEncode(format!("Failed to create encoder: {e}")))?;

        let repeat = match repeat {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| ReloopError::GifEncode(format!("Failed to set repeat: {e}")))?;

        Ok(Self {
            encoder,
            frames_written: 0,
        })
    }

    /// Append one frame in display order.
    ///
    /// The frame's delay is converted from milliseconds to the container's
    /// centisecond units, clamped to at least one centisecond.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::GifEncode`] if the frame cannot be written.
    pub fn push(&mut self, frame: &IndexedFrame) -> Result<(), ReloopError> {
        let gif_frame = Frame {
            width: frame.width as u16,
            height: frame.height as u16,
            buffer: Cow::Borrowed(frame.indices.as_slice()),
            palette: Some(frame.palette.clone()),
            delay: (frame.delay_ms / 10).max(1) as u16,
            ..Frame::default()
        };

        self.encoder.write_frame(&gif_frame).map_err(|e| {
            ReloopError::GifEncode(format!(
                "Failed to write frame {}: {e}",
                self.frames_written,
            ))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    /// Frames appended so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write the trailer and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::GifEncode`] if the trailer cannot be written.
    pub fn finish(self) -> Result<W, ReloopError> {
        self.encoder
            .into_inner()
            .map_err(|e| ReloopError::GifEncode(format!("Failed to finalize container: {e}")))
    }
}

/// A finalized conversion result.
///
/// Immutable once produced: the complete GIF byte sequence plus the facts a
/// caller needs to hand it on (dimensions, frame count, sampling
/// degradations).
#[derive(Debug, Clone)]
pub struct GifOutput {
    /// The finalized container bytes.
    pub bytes: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of frames in the container.
    pub frame_count: u64,
    /// Seeks that missed their deadline and were absorbed by duplicating the
    /// previous frame.
    pub seek_timeouts: u64,
}

impl GifOutput {
    /// MIME type of the container, suitable for a download response.
    pub fn mime_type(&self) -> &'static str {
        GIF_MIME
    }

    /// Suggested download filename: `{prefix}-{unix_seconds}.gif`.
    pub fn suggested_filename(&self, prefix: &str) -> String {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("{prefix}-{seconds}.gif")
    }

    /// Write the container bytes to a file.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::Io`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ReloopError> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        Ok(())
    }
}
