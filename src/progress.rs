//! Progress reporting for long-running conversions.
//!
//! A conversion walks every frame of the sample plan, so total work is known
//! up front. [`ProgressCallback`] receives [`ProgressInfo`] snapshots at a
//! cadence controlled by
//! [`ConvertOptions::with_progress_batch`](crate::ConvertOptions::with_progress_batch).
//!
//! Callbacks observe but cannot halt the pipeline: once started, a conversion
//! runs to completion or to a hard failure.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reloop::{ConvertOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.stage);
//!         }
//!     }
//! }
//!
//! let options = ConvertOptions::new().with_progress(Arc::new(PrintProgress));
//! let output = reloop::convert("input.mp4", &options)?;
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The pipeline stage a progress snapshot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertStage {
    /// Seeking, sampling, and quantizing frames (the bulk of the work).
    FrameSampling,
    /// Finalizing the GIF container.
    ContainerAssembly,
}

/// A snapshot of conversion progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Which stage of the pipeline is running.
    pub stage: ConvertStage,
    /// Frames fully processed (sampled, quantized, appended) so far.
    pub frames_done: u64,
    /// Total frames in the sample plan.
    pub total_frames: u64,
    /// Completion percentage (0.0 – 100.0), if `total_frames` is non-zero.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the conversion started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Clip timestamp of the frame most recently processed.
    pub timestamp: Option<Duration>,
    /// Seeks absorbed by the timeout fallback so far.
    pub seek_timeouts: u64,
}

/// Trait for receiving progress updates during a conversion.
///
/// Implementations must be [`Send`] and [`Sync`]; with the `async` feature a
/// conversion runs on a blocking worker thread and fires callbacks from
/// there.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals while frames are processed.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Default callback that discards all notifications.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks timing and emits batched callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    stage: ConvertStage,
    total_frames: u64,
    frames_done: u64,
    seek_timeouts: u64,
    batch: u64,
    since_last_report: u64,
    started: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        stage: ConvertStage,
        total_frames: u64,
        batch: u64,
    ) -> Self {
        Self {
            callback,
            stage,
            total_frames,
            frames_done: 0,
            seek_timeouts: 0,
            batch: batch.max(1),
            since_last_report: 0,
            started: Instant::now(),
        }
    }

    /// Record one completed frame and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn frame_done(&mut self, timestamp: Duration, seek_timeouts: u64) {
        self.frames_done += 1;
        self.seek_timeouts = seek_timeouts;
        self.since_last_report += 1;

        if self.since_last_report >= self.batch {
            self.report(Some(timestamp));
            self.since_last_report = 0;
        }
    }

    /// Unconditionally emit a final snapshot for the given stage.
    pub(crate) fn finish(&mut self, stage: ConvertStage) {
        self.stage = stage;
        self.report(None);
    }

    fn report(&self, timestamp: Option<Duration>) {
        let elapsed = self.started.elapsed();

        let percentage = if self.total_frames > 0 {
            Some((self.frames_done as f32 / self.total_frames as f32) * 100.0)
        } else {
            None
        };

        let estimated_remaining = if self.frames_done > 0 {
            let remaining = self.total_frames.saturating_sub(self.frames_done);
            let per_frame = elapsed / self.frames_done as u32;
            Some(per_frame * remaining as u32)
        } else {
            None
        };

        let info = ProgressInfo {
            stage: self.stage,
            frames_done: self.frames_done,
            total_frames: self.total_frames,
            percentage,
            elapsed,
            estimated_remaining,
            timestamp,
            seek_timeouts: self.seek_timeouts,
        };

        self.callback.on_progress(&info);
    }
}
