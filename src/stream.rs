//! Async conversion support.
//!
//! A conversion is CPU- and seek-bound FFmpeg work, so it runs on a blocking
//! worker via `tokio::task::spawn_blocking`; [`GifFuture`] resolves when the
//! container is finalized. Progress callbacks fire from the worker thread —
//! [`ProgressCallback`](crate::ProgressCallback) is `Send + Sync` for exactly
//! this reason.
//!
//! # Example
//!
//! ```no_run
//! use reloop::ConvertOptions;
//!
//! # async fn example() -> Result<(), reloop::ReloopError> {
//! let output = reloop::convert_async("clip.mp4", ConvertOptions::new()).await?;
//! println!("{} frames", output.frame_count);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::config::ConvertOptions;
use crate::error::ReloopError;
use crate::gif::GifOutput;

/// A future resolving to a finalized [`GifOutput`].
///
/// Created by [`convert_async`]; polling drives the underlying blocking task
/// to completion. Must be awaited inside a Tokio runtime.
pub struct GifFuture {
    handle: JoinHandle<Result<GifOutput, ReloopError>>,
}

impl Future for GifFuture {
    type Output = Result<GifOutput, ReloopError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|result| match result {
                Ok(inner) => inner,
                Err(join_error) => Err(ReloopError::TaskJoin(join_error.to_string())),
            })
    }
}

/// Convert a clip to a looping GIF on a blocking worker thread.
///
/// Options are moved into the task; attach progress callbacks before
/// calling. See [`convert`](crate::convert) for the error contract.
pub fn convert_async<P: Into<PathBuf>>(source: P, options: ConvertOptions) -> GifFuture {
    let source = source.into();
    let handle =
        tokio::task::spawn_blocking(move || crate::convert::convert(&source, &options));
    GifFuture { handle }
}
