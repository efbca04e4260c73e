//! Playback engine: tracks, queue, decode pipelines and per-room sessions.
//!
//! A [`PlaybackSession`] plays the tracks of its [`TrackQueue`] one after the
//! other into an [`AudioSink`], building a fresh [`DecodePipeline`] for every
//! track. Sessions are indexed by room in the [`SessionRegistry`].

mod fetch;
mod pipeline;
mod queue;
mod registry;
mod session;
mod sink;
mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{HttpPreviewFetcher, PreviewFetcher};
pub use pipeline::{AudioFrame, DecodePipeline, Mp3Pipeline, Mp3PipelineFactory, PipelineFactory};
pub use queue::TrackQueue;
pub use registry::SessionRegistry;
pub use session::{EndReason, PlaybackDeps, PlaybackSession, PlaybackState, SessionDriver};
pub use sink::{AudioSink, FrameProvider};
pub use track::Track;

use std::sync::Arc;

use thiserror::Error;

/// Errors raised while playing a track.
///
/// These never cross the request/response boundary; they are delivered to
/// the session's [`ErrorHandler`].
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("preview fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("preview fetch returned http code: {0}")]
    FetchStatus(u16),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("audio sink error: {0}")]
    Sink(String),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Callback receiving playback errors of a detached session.
pub type ErrorHandler = Arc<dyn Fn(&PlaybackError) + Send + Sync>;
