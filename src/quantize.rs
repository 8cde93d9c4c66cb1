//! Per-frame color quantization.
//!
//! Maps a raw RGBA frame to an [`IndexedFrame`]: an ordered palette of at
//! most 256 colors chosen by NeuQuant, plus the nearest palette index for
//! every pixel. Each frame is quantized independently — there is no shared
//! palette across frames, trading cross-frame compression for per-frame
//! color fidelity.
//!
//! Quantization over a well-formed buffer always succeeds; there is no error
//! path. An empty buffer is a precondition violation.

use color_quant::NeuQuant;
use image::RgbaImage;

use crate::frame::IndexedFrame;

/// Quantize one raw frame to an indexed palette of at most `palette_size`
/// colors.
///
/// `speed` is NeuQuant's sampling factor: 1 scans every pixel (best
/// quality), 30 samples sparsely (fastest). `delay_ms` is carried through to
/// the resulting frame unchanged.
///
/// # Panics
///
/// Debug builds panic on an empty pixel buffer; callers must uphold the
/// non-empty precondition.
pub fn quantize(
    frame: &RgbaImage,
    palette_size: u16,
    speed: i32,
    delay_ms: u32,
) -> IndexedFrame {
    let pixels = frame.as_raw();
    debug_assert!(!pixels.is_empty(), "cannot quantize an empty frame");

    let quantizer = NeuQuant::new(speed, usize::from(palette_size), pixels);
    let palette = quantizer.color_map_rgb();

    let mut indices = Vec::with_capacity(pixels.len() / 4);
    for pixel in pixels.chunks_exact(4) {
        indices.push(quantizer.index_of(pixel) as u8);
    }

    IndexedFrame {
        width: frame.width(),
        height: frame.height(),
        palette,
        indices,
        delay_ms,
    }
}
