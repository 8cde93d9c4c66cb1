//! Frame presentation sources.
//!
//! [`FrameSource`] is the seam between the sampler and whatever is actually
//! decoding video. A source is asked to *present* the frame nearest a
//! timestamp in two steps: [`request`](FrameSource::request) begins the seek,
//! and [`await_presented`](FrameSource::await_presented) resolves on
//! first-of(frame presented, deadline). A missed deadline is reported as
//! `Ok(None)`, never as an error — the sampler absorbs it by reusing the
//! previous presented frame.
//!
//! [`ClipDecoder`] is the production source: a dedicated decode thread owning
//! its own demuxer, decoder, and RGBA scaler at plan resolution. Requests and
//! presented frames travel over channels, and the deadline race is
//! `recv_timeout`. The worker and its scaler are torn down when the decoder
//! is dropped, so nothing leaks across repeated conversions.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::Pixel,
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbaImage;

use crate::clip::ClipInfo;
use crate::error::ReloopError;
use crate::plan::SamplePlan;
use crate::util;

/// A source that can present decoded frames at requested timestamps.
///
/// Implemented by [`ClipDecoder`] for real clips; tests implement it with
/// scripted doubles to simulate seeks that never complete.
pub trait FrameSource {
    /// Width and height of presented frames.
    fn frame_size(&self) -> (u32, u32);

    /// Begin a seek toward `timestamp`. Returns without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source can no longer accept requests at
    /// all (e.g. its decode worker terminated).
    fn request(&mut self, timestamp: Duration) -> Result<(), ReloopError>;

    /// Wait for the frame requested last, up to `timeout`.
    ///
    /// Resolves on whichever comes first: the frame is presented
    /// (`Ok(Some(frame))`) or the deadline elapses (`Ok(None)`). Frames
    /// presented late, in answer to an *earlier* request, are discarded
    /// while waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the source failed while decoding. The sampler
    /// treats such failures as fatal before the first presentation and
    /// absorbs them afterwards.
    fn await_presented(&mut self, timeout: Duration)
    -> Result<Option<RgbaImage>, ReloopError>;
}

/// One queued seek.
struct SeekRequest {
    seq: u64,
    timestamp: Duration,
}

/// Reply from the decode worker. `seq` 0 marks a terminal startup failure.
type Presented = (u64, Result<RgbaImage, ReloopError>);

/// Production [`FrameSource`] decoding a clip on a dedicated worker thread.
///
/// Spawned per conversion via [`ClipDecoder::spawn`]; each instance owns its
/// media handle and scaling surface outright, so independent conversions
/// share no mutable state.
pub struct ClipDecoder {
    width: u32,
    height: u32,
    next_seq: u64,
    requests: Option<Sender<SeekRequest>>,
    presented: Receiver<Presented>,
    worker: Option<JoinHandle<()>>,
}

impl ClipDecoder {
    /// Spawn a decode worker for `clip`, scaling to the plan's resolution.
    ///
    /// The worker opens its own demuxer from the clip's source; open
    /// failures surface through the first [`await_presented`](FrameSource::await_presented)
    /// call rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`ReloopError::Io`] if the worker thread cannot be spawned.
    pub fn spawn(clip: &ClipInfo, plan: &SamplePlan) -> Result<Self, ReloopError> {
        let (request_tx, request_rx) = channel::<SeekRequest>();
        let (presented_tx, presented_rx) = channel::<Presented>();

        let source = clip.source.clone();
        let (width, height) = (plan.width, plan.height);

        let worker = std::thread::Builder::new()
            .name("reloop-decode".to_string())
            .spawn(move || {
                match DecodeWorker::open(&source, width, height) {
                    Ok(mut worker) => worker.run(&request_rx, &presented_tx),
                    Err(error) => {
                        // Terminal: anyone waiting learns the clip is unusable.
                        let _ = presented_tx.send((0, Err(error)));
                    }
                }
            })?;

        Ok(Self {
            width,
            height,
            next_seq: 0,
            requests: Some(request_tx),
            presented: presented_rx,
            worker: Some(worker),
        })
    }
}

impl FrameSource for ClipDecoder {
    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn request(&mut self, timestamp: Duration) -> Result<(), ReloopError> {
        self.next_seq += 1;
        let request = SeekRequest {
            seq: self.next_seq,
            timestamp,
        };
        self.requests
            .as_ref()
            .and_then(|tx| tx.send(request).ok())
            .ok_or_else(|| ReloopError::ClipDecode("decode worker terminated".to_string()))
    }

    fn await_presented(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<RgbaImage>, ReloopError> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.presented.recv_timeout(remaining) {
                Ok((seq, Ok(frame))) if seq == self.next_seq => return Ok(Some(frame)),
                // A frame for an earlier request arrived late; keep waiting
                // for the current one within the same deadline.
                Ok((_, Ok(_))) => continue,
                Ok((_, Err(error))) => return Err(error),
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ReloopError::ClipDecode(
                        "decode worker terminated".to_string(),
                    ));
                }
            }
        }
    }
}

impl Drop for ClipDecoder {
    fn drop(&mut self) {
        // Closing the request channel ends the worker's receive loop.
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Decode-thread state: demuxer, decoder, and the RGBA scaling surface.
struct DecodeWorker {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: ffmpeg_next::Rational,
    width: u32,
    height: u32,
    /// Most recently decoded frame, scaled — the nearest-frame fallback once
    /// the stream runs out.
    last_frame: Option<RgbaImage>,
    /// Timestamp of the most recently decoded frame, in seconds.
    last_secs: Option<f64>,
    /// Set once the decoder has been drained at end of stream.
    flushed: bool,
}

impl DecodeWorker {
    fn open(source: &PathBuf, width: u32, height: u32) -> Result<Self, ReloopError> {
        let input = ffmpeg_next::format::input(source)?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or(ReloopError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();

        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGBA,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            time_base,
            width,
            height,
            last_frame: None,
            last_secs: None,
            flushed: false,
        })
    }

    /// Serve seek requests until the converter hangs up.
    fn run(&mut self, requests: &Receiver<SeekRequest>, presented: &Sender<Presented>) {
        for request in requests.iter() {
            let result = self.present(request.timestamp);
            if presented.send((request.seq, result)).is_err() {
                break;
            }
        }
    }

    /// Produce the frame nearest `timestamp`, decoding forward or seeking as
    /// needed.
    fn present(&mut self, timestamp: Duration) -> Result<RgbaImage, ReloopError> {
        let target = timestamp.as_secs_f64();

        // Going backwards (or starting over) needs a demuxer seek and a
        // decoder reset; moving forward just decodes more frames.
        let needs_seek = match self.last_secs {
            Some(last) => target <= last,
            None => false,
        };
        if needs_seek {
            let stream_ts = util::duration_to_stream_timestamp(timestamp, self.time_base);
            self.input.seek(stream_ts, ..stream_ts)?;
            self.decoder.flush();
            self.flushed = false;
        }

        if !self.flushed {
            if let Some(frame) = self.decode_until(target)? {
                return Ok(frame);
            }
        }

        // End of stream: the nearest frame is the last one decoded.
        self.last_frame
            .clone()
            .ok_or_else(|| ReloopError::ClipDecode("stream ended before any frame".to_string()))
    }

    /// Decode forward until a frame at or past `target` seconds appears.
    fn decode_until(&mut self, target: f64) -> Result<Option<RgbaImage>, ReloopError> {
        let mut decoded = VideoFrame::empty();

        // Walk the stream until a frame lands at or past the target.
        loop {
            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {}
                Err(ffmpeg_next::Error::Eof) => break,
                Err(error) => return Err(error.into()),
            }
            if packet.stream() != self.stream_index {
                continue;
            }

            self.decoder.send_packet(&packet)?;
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                if let Some(frame) = self.take_scaled(&decoded, target)? {
                    return Ok(Some(frame));
                }
            }
        }

        // Drain the decoder once the demuxer is exhausted.
        self.decoder.send_eof()?;
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            if let Some(frame) = self.take_scaled(&decoded, target)? {
                self.flushed = true;
                return Ok(Some(frame));
            }
        }
        self.flushed = true;
        Ok(None)
    }

    /// Scale one decoded frame, remember it as the presentation fallback, and
    /// return it if it reaches `target`.
    fn take_scaled(
        &mut self,
        decoded: &VideoFrame,
        target: f64,
    ) -> Result<Option<RgbaImage>, ReloopError> {
        let secs = util::pts_to_seconds(decoded.pts().unwrap_or(0), self.time_base);

        let mut rgba = VideoFrame::empty();
        self.scaler.run(decoded, &mut rgba)?;
        let buffer = util::frame_to_rgba_buffer(&rgba, self.width, self.height);
        let image = RgbaImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            ReloopError::ClipDecode("failed to assemble RGBA buffer from decoded frame".to_string())
        })?;

        self.last_secs = Some(secs);
        self.last_frame = Some(image.clone());

        if secs + 1e-9 >= target {
            Ok(Some(image))
        } else {
            Ok(None)
        }
    }
}
