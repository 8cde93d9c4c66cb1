//! The conversion pipeline.
//!
//! One operation, three stages interleaved per frame: sample a raw frame,
//! quantize it to an indexed palette, append it to the container. Raw frames
//! are never buffered — each one is consumed the moment it is presented, so
//! memory stays flat regardless of clip length.
//!
//! # Example
//!
//! ```no_run
//! use reloop::ConvertOptions;
//!
//! let output = reloop::convert("clip.mp4", &ConvertOptions::new())?;
//! println!(
//!     "{} frames, {} bytes, {} absorbed timeouts",
//!     output.frame_count,
//!     output.bytes.len(),
//!     output.seek_timeouts,
//! );
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::path::Path;

use crate::clip::ClipInfo;
use crate::config::ConvertOptions;
use crate::error::ReloopError;
use crate::gif::{GifAssembler, GifOutput};
use crate::plan::SamplePlan;
use crate::progress::{ConvertStage, ProgressTracker};
use crate::quantize::quantize;
use crate::sampler::{FrameSampler, SampleStats};
use crate::source::{ClipDecoder, FrameSource};

/// Convert a playable video resource into a looping GIF held in memory.
///
/// Probes the clip, derives the sample plan, spawns a decode worker, and
/// runs the per-frame pipeline to completion. The returned
/// [`GifOutput`] contains exactly `floor(duration × fps)` frames.
///
/// # Errors
///
/// - [`ReloopError::ClipOpen`] / [`ReloopError::PixelAccessDenied`] /
///   [`ReloopError::NoVideoStream`] if the source is unusable.
/// - [`ReloopError::EmptyClip`] if the plan derives zero frames.
/// - [`ReloopError::ClipStalled`] if the clip never presents a frame.
/// - Option-range errors from [`ConvertOptions::validate`].
/// - [`ReloopError::GifEncode`] if container assembly fails.
pub fn convert<P: AsRef<Path>>(
    source: P,
    options: &ConvertOptions,
) -> Result<GifOutput, ReloopError> {
    let clip = ClipInfo::probe(source)?;
    let plan = SamplePlan::derive(&clip, options)?;

    log::debug!(
        "Converting {:?}: {} frames at {}x{}, {} fps",
        clip.source,
        plan.frame_count,
        plan.width,
        plan.height,
        plan.frame_rate,
    );

    let mut decoder = ClipDecoder::spawn(&clip, &plan)?;
    convert_source(&mut decoder, &plan, options)
}

/// Convert a clip and write the container straight to `dest`.
///
/// Same pipeline as [`convert`]; returns the output with its bytes retained
/// so callers can still inspect frame counts and statistics.
///
/// # Errors
///
/// Everything from [`convert`], plus [`ReloopError::Io`] if `dest` cannot be
/// written.
pub fn convert_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest: Q,
    options: &ConvertOptions,
) -> Result<GifOutput, ReloopError> {
    let output = convert(source, options)?;
    output.save(dest)?;
    Ok(output)
}

/// Run the per-frame pipeline over any [`FrameSource`].
///
/// This is the seam used by tests (scripted sources with deterministic
/// content or seeks that never complete) and by embedders bringing their own
/// decoders. The plan must match the source's presented frame size.
///
/// # Errors
///
/// Everything from the sampler and assembler; see [`convert`].
pub fn convert_source<S: FrameSource>(
    source: &mut S,
    plan: &SamplePlan,
    options: &ConvertOptions,
) -> Result<GifOutput, ReloopError> {
    options.validate()?;

    let mut assembler = GifAssembler::in_memory(plan.width, plan.height, options.repeat)?;
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        ConvertStage::FrameSampling,
        plan.frame_count,
        options.progress_batch,
    );

    let palette_size = options.palette_size;
    let speed = options.quantizer_speed;
    let delay_ms = plan.delay_ms;

    let sampler = FrameSampler::new(source, plan, options);
    let stats: SampleStats = sampler.run(|index, raw, running| {
        let indexed = quantize(raw, palette_size, speed, delay_ms);
        assembler.push(&indexed)?;
        tracker.frame_done(plan.timestamp_for(index), running.seek_timeouts);
        Ok(())
    })?;

    let bytes = assembler.finish()?;
    tracker.finish(ConvertStage::ContainerAssembly);

    if stats.seek_timeouts > 0 || stats.decode_faults > 0 {
        log::debug!(
            "Conversion degraded but complete: {} seek timeouts, {} decode faults over {} frames",
            stats.seek_timeouts,
            stats.decode_faults,
            stats.frames_emitted,
        );
    }

    Ok(GifOutput {
        bytes,
        width: plan.width,
        height: plan.height,
        frame_count: stats.frames_emitted,
        seek_timeouts: stats.seek_timeouts,
    })
}
