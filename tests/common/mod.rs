//! Shared test doubles: deterministic synthetic clips and a scriptable
//! frame source for exercising the pipeline without FFmpeg.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use reloop::{ClipInfo, FrameSource, ReloopError};

/// What a scripted source does in answer to one seek request.
#[derive(Debug, Clone, Copy)]
pub enum SeekScript {
    /// Present a solid frame of the given RGBA color.
    Deliver([u8; 4]),
    /// Present a deterministic multi-color gradient seeded by the value.
    DeliverGradient(u8),
    /// Never signal completion — the sampler's deadline must fire.
    Stall,
}

/// A [`FrameSource`] whose behavior is fully scripted per request.
///
/// Requests beyond the script's end stall, which keeps "script too short"
/// failures visible as timeout counts rather than panics.
pub struct ScriptedSource {
    width: u32,
    height: u32,
    script: VecDeque<SeekScript>,
    pending: Option<SeekScript>,
    /// Every timestamp the sampler asked for, in order.
    pub requested: Vec<Duration>,
}

impl ScriptedSource {
    pub fn new(width: u32, height: u32, script: Vec<SeekScript>) -> Self {
        Self {
            width,
            height,
            script: script.into(),
            pending: None,
            requested: Vec::new(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn request(&mut self, timestamp: Duration) -> Result<(), ReloopError> {
        self.requested.push(timestamp);
        self.pending = Some(self.script.pop_front().unwrap_or(SeekScript::Stall));
        Ok(())
    }

    fn await_presented(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<RgbaImage>, ReloopError> {
        match self.pending.take() {
            Some(SeekScript::Deliver(color)) => {
                Ok(Some(solid_frame(self.width, self.height, color)))
            }
            Some(SeekScript::DeliverGradient(seed)) => {
                Ok(Some(gradient_frame(self.width, self.height, seed)))
            }
            Some(SeekScript::Stall) | None => Ok(None),
        }
    }
}

/// A frame filled with one color.
pub fn solid_frame(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// A deterministic gradient: same (width, height, seed) always yields the
/// same pixels.
pub fn gradient_frame(width: u32, height: u32, seed: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x % 256) as u8,
            (y % 256) as u8,
            seed,
            255,
        ])
    })
}

/// Probed metadata for a synthetic clip that exists only in tests.
pub fn synthetic_clip(width: u32, height: u32, duration_secs: f64) -> ClipInfo {
    ClipInfo {
        source: PathBuf::from("synthetic.mp4"),
        width,
        height,
        frames_per_second: 30.0,
        duration: Duration::from_secs_f64(duration_secs),
        codec: "h264".to_string(),
    }
}

/// A script that primes and then delivers `frames` distinct gradient frames.
pub fn delivering_script(frames: u64) -> Vec<SeekScript> {
    let mut script = vec![SeekScript::Deliver([0, 0, 0, 255])];
    for i in 0..frames {
        script.push(SeekScript::DeliverGradient((i % 256) as u8));
    }
    script
}

/// Decode a finalized GIF and return `(width, height, per-frame info)` where
/// each frame entry is `(delay_in_centiseconds, palette_color_count)`.
pub fn decode_gif(bytes: &[u8]) -> (u16, u16, Vec<(u16, usize)>) {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(std::io::Cursor::new(bytes))
        .expect("container header should decode");

    let (width, height) = (decoder.width(), decoder.height());
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().expect("frame should decode") {
        let palette_len = frame.palette.as_ref().map(|p| p.len() / 3).unwrap_or(0);
        frames.push((frame.delay, palette_len));
    }
    (width, height, frames)
}
