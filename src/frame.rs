//! Frame representations moving through the pipeline.
//!
//! A raw frame is an [`image::RgbaImage`] at plan resolution, produced by the
//! sampler and consumed immediately by the quantizer. An [`IndexedFrame`] is
//! the quantized form: an ordered palette of at most 256 colors, one palette
//! index per pixel, and the frame's display delay. Indexed frames are what
//! the [`GifAssembler`](crate::GifAssembler) appends to the container.

use image::RgbaImage;

/// One quantized frame: palette + per-pixel indices + display delay.
///
/// Produced by [`quantize`](crate::quantize::quantize); owned by the
/// assembler until the container is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Ordered palette as flat RGB triples (`3 × palette_len` bytes).
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major (`width × height` bytes).
    pub indices: Vec<u8>,
    /// Display delay in milliseconds.
    pub delay_ms: u32,
}

impl IndexedFrame {
    /// Number of colors in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len() / 3
    }
}

/// Debug-time sanity check that a raw frame matches the plan resolution.
pub(crate) fn assert_frame_shape(frame: &RgbaImage, width: u32, height: u32) {
    debug_assert_eq!(
        (frame.width(), frame.height()),
        (width, height),
        "presented frame does not match the sample plan resolution",
    );
}
