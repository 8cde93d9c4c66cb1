//! Timed frame sampling.
//!
//! [`FrameSampler`] walks a [`SamplePlan`](crate::SamplePlan) over any
//! [`FrameSource`], producing exactly one raw frame per plan index. Each
//! iteration yields to the scheduler, requests a seek to `index / fps`, and
//! waits for presentation with a per-seek deadline. A seek that misses the
//! deadline is absorbed: the previous presented frame is reused, the event is
//! counted in [`SampleStats`], and the sequence never shrinks. Favoring
//! throughput over per-frame correctness is deliberate — a duplicate frame is
//! an acceptable degradation, a stalled pipeline is not.
//!
//! Before the loop, the sampler *primes*: it asks for the frame at t = 0 and
//! waits up to the load timeout. A clip that never presents anything fails
//! here with [`ReloopError::ClipStalled`]; after priming there is always a
//! presented frame to fall back on.

use std::time::Duration;

use image::RgbaImage;

use crate::config::ConvertOptions;
use crate::error::ReloopError;
use crate::frame::assert_frame_shape;
use crate::plan::SamplePlan;
use crate::source::FrameSource;

/// Counters describing how a sampling run went.
///
/// Degradations recorded here were fully absorbed — the output still contains
/// every planned frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// Frames handed to the sink (always the plan's frame count on success).
    pub frames_emitted: u64,
    /// Seeks that missed their deadline; the previous frame was reused.
    pub seek_timeouts: u64,
    /// Decode faults after priming; the previous frame was reused.
    pub decode_faults: u64,
}

/// Drives a [`FrameSource`] through every timestamp of a sample plan.
pub struct FrameSampler<'a, S: FrameSource> {
    source: &'a mut S,
    plan: &'a SamplePlan,
    seek_timeout: Duration,
    load_timeout: Duration,
}

impl<'a, S: FrameSource> FrameSampler<'a, S> {
    /// Create a sampler over `source` following `plan`, with deadlines taken
    /// from `options`.
    pub fn new(source: &'a mut S, plan: &'a SamplePlan, options: &ConvertOptions) -> Self {
        Self {
            source,
            plan,
            seek_timeout: options.seek_timeout,
            load_timeout: options.load_timeout,
        }
    }

    /// Run the full sampling loop, handing each presented frame to `sink` in
    /// display order together with its plan index and the running statistics.
    ///
    /// The sink is called exactly `plan.frame_count` times on success. Errors
    /// returned by the sink abort the run.
    ///
    /// # Errors
    ///
    /// - [`ReloopError::ClipStalled`] if the source never presents a first
    ///   frame within the load timeout.
    /// - Any fatal source error raised before the first presentation.
    /// - Any error returned by `sink`.
    pub fn run<F>(mut self, mut sink: F) -> Result<SampleStats, ReloopError>
    where
        F: FnMut(u64, &RgbaImage, &SampleStats) -> Result<(), ReloopError>,
    {
        let mut stats = SampleStats::default();
        let mut presented = self.prime()?;

        for index in 0..self.plan.frame_count {
            // Cooperative scheduling: long conversions must not starve the
            // host of this thread's timeslice.
            std::thread::yield_now();

            let timestamp = self.plan.timestamp_for(index);
            let outcome = self
                .source
                .request(timestamp)
                .and_then(|()| self.source.await_presented(self.seek_timeout));
            match outcome {
                Ok(Some(frame)) => {
                    assert_frame_shape(&frame, self.plan.width, self.plan.height);
                    presented = frame;
                }
                Ok(None) => {
                    stats.seek_timeouts += 1;
                    log::debug!(
                        "Seek to {timestamp:?} (frame {index}) missed its {:?} deadline; \
                         reusing previous frame",
                        self.seek_timeout,
                    );
                }
                Err(error) => {
                    stats.decode_faults += 1;
                    log::warn!(
                        "Decode fault at frame {index} absorbed, reusing previous frame: {error}",
                    );
                }
            }

            stats.frames_emitted += 1;
            sink(index, &presented, &stats)?;
        }

        Ok(stats)
    }

    /// Wait for the source to present its first frame.
    fn prime(&mut self) -> Result<RgbaImage, ReloopError> {
        self.source.request(Duration::ZERO)?;
        match self.source.await_presented(self.load_timeout)? {
            Some(frame) => {
                assert_frame_shape(&frame, self.plan.width, self.plan.height);
                Ok(frame)
            }
            None => Err(ReloopError::ClipStalled {
                waited: self.load_timeout,
            }),
        }
    }
}
