//! Per-room playback session and the task driving it.
//!
//! [`PlaybackSession`] is the shared handle stored in the registry: room,
//! queue, observable state and a stop switch. [`SessionDriver`] owns
//! everything else (sink, pipeline slot, signal channel) and runs the state
//! machine on a single task:
//!
//! ```text
//! Idle ──first track loaded──▶ Playing ──stream ended──▶ Advancing
//!                                 ▲                         │
//!                                 └──────next track loaded──┘
//! any state ──drained / stop / provider closed / failure──▶ Stopped
//! ```
//!
//! Tracks are strictly sequential: track N+1 is fetched only after track N's
//! stream-ended signal. Every terminal transition removes the session from
//! the registry.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::fetch::PreviewFetcher;
use super::pipeline::{DecodePipeline, PipelineFactory};
use super::queue::TrackQueue;
use super::registry::SessionRegistry;
use super::sink::{AudioSink, PipelineSignal, PipelineSlot, SessionFrameProvider};
use super::track::Track;
use super::{ErrorHandler, PlaybackError, PlaybackResult};
use crate::config::FailurePolicy;
use crate::events::{EventEmitter, SessionEvent};
use crate::platform::RoomId;
use crate::utils::now_millis;

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Reserved, no pipeline attached yet.
    Idle,
    /// A pipeline is attached and audio flows to the sink.
    Playing,
    /// The current track finished; the next one is being loaded.
    Advancing,
    /// Terminal.
    Stopped,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The queue ran out of tracks.
    Drained,
    /// [`PlaybackSession::stop`] was called.
    Stopped,
    /// The sink reported that its transport is gone.
    ProviderClosed,
    /// A track failed and the failure policy said to stop.
    Failed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Shared handle to one room's quiz playback.
#[derive(Debug)]
pub struct PlaybackSession {
    id: String,
    room_id: RoomId,
    queue: TrackQueue,
    state: RwLock<PlaybackState>,
    current: RwLock<Option<Track>>,
    cancel: CancellationToken,
}

impl PlaybackSession {
    /// Creates an idle session with an empty queue.
    pub fn new(room_id: RoomId) -> Arc<Self> {
        Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            room_id,
            queue: TrackQueue::new(),
            state: RwLock::new(PlaybackState::Idle),
            current: RwLock::new(None),
            cancel: CancellationToken::new(),
        })
    }

    /// Unique id distinguishing this session from later ones in the same room.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.read()
    }

    /// The track currently attached to the sink, if any.
    pub fn current_track(&self) -> Option<Track> {
        self.current.read().clone()
    }

    /// Requests the session to stop.
    ///
    /// Returns immediately; the driver tears the session down on its own task.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether a stop was requested or the session already ended.
    pub fn is_stopping(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes once a stop was requested.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    fn set_state(&self, state: PlaybackState) {
        *self.state.write() = state;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Collaborators shared by every session driver.
#[derive(Clone)]
pub struct PlaybackDeps {
    pub factory: Arc<dyn PipelineFactory>,
    pub fetcher: Arc<dyn PreviewFetcher>,
    pub registry: Arc<SessionRegistry>,
    pub events: Arc<dyn EventEmitter>,
    pub policy: FailurePolicy,
}

/// Runs one session from its first track to teardown.
pub struct SessionDriver {
    session: Arc<PlaybackSession>,
    sink: Arc<dyn AudioSink>,
    deps: PlaybackDeps,
    on_error: ErrorHandler,
    slot: PipelineSlot,
    signals: mpsc::UnboundedReceiver<PipelineSignal>,
    signal_tx: mpsc::UnboundedSender<PipelineSignal>,
    provider_closed: CancellationToken,
}

impl SessionDriver {
    pub fn new(
        session: Arc<PlaybackSession>,
        sink: Arc<dyn AudioSink>,
        deps: PlaybackDeps,
        on_error: ErrorHandler,
    ) -> Self {
        let (signal_tx, signals) = mpsc::unbounded_channel();
        Self {
            session,
            sink,
            deps,
            on_error,
            slot: Arc::new(Mutex::new(None)),
            signals,
            signal_tx,
            provider_closed: CancellationToken::new(),
        }
    }

    /// Plays the queue until a terminal transition, then tears down.
    ///
    /// Errors are delivered to the error handler, never returned.
    pub async fn run(mut self) -> EndReason {
        let room_id = self.session.room_id;

        self.sink.set_frame_provider(Box::new(SessionFrameProvider::new(
            self.slot.clone(),
            self.signal_tx.clone(),
            self.provider_closed.clone(),
        )));

        log::info!(
            "[Session] Starting session {} in room {} with {} track(s)",
            self.session.id,
            room_id,
            self.session.queue.len()
        );
        self.deps.events.emit_session(SessionEvent::Started {
            room_id,
            session_id: self.session.id.clone(),
            queued: self.session.queue.len(),
            timestamp: now_millis(),
        });

        let reason = self.drive().await;
        self.finish(reason).await;
        reason
    }

    async fn drive(&mut self) -> EndReason {
        if let Some(reason) = self.advance().await {
            return reason;
        }

        loop {
            let signal = tokio::select! {
                biased;
                _ = self.session.cancel.cancelled() => return EndReason::Stopped,
                _ = self.provider_closed.cancelled() => return EndReason::ProviderClosed,
                signal = self.signals.recv() => signal,
            };

            match signal {
                Some(PipelineSignal::StreamEnded) => {
                    self.session.set_state(PlaybackState::Advancing);
                    if let Some(reason) = self.advance().await {
                        return reason;
                    }
                }
                Some(PipelineSignal::ProviderClosed) | None => return EndReason::ProviderClosed,
                Some(PipelineSignal::Failed(err)) => {
                    self.report(&err);
                    if self.deps.policy == FailurePolicy::Stop {
                        return EndReason::Failed;
                    }
                    self.session.set_state(PlaybackState::Advancing);
                    if let Some(reason) = self.advance().await {
                        return reason;
                    }
                }
            }
        }
    }

    /// Loads the next track into the slot.
    ///
    /// Returns the end reason when the session cannot continue.
    async fn advance(&self) -> Option<EndReason> {
        loop {
            if self.session.cancel.is_cancelled() {
                return Some(EndReason::Stopped);
            }
            let Some(track) = self.session.queue.pop() else {
                return Some(EndReason::Drained);
            };

            let loaded = tokio::select! {
                biased;
                _ = self.session.cancel.cancelled() => return Some(EndReason::Stopped),
                _ = self.provider_closed.cancelled() => return Some(EndReason::ProviderClosed),
                loaded = self.load(&track) => loaded,
            };

            match loaded {
                Ok(pipeline) => {
                    *self.slot.lock() = Some(pipeline);
                    self.play(track);
                    return None;
                }
                Err(err) => {
                    log::warn!("[Session] Track {} failed to load: {}", track.id(), err);
                    self.report(&err);
                    if self.deps.policy == FailurePolicy::Stop {
                        return Some(EndReason::Failed);
                    }
                }
            }
        }
    }

    /// Builds a fresh pipeline and buffers the whole preview into it.
    async fn load(&self, track: &Track) -> PlaybackResult<Box<dyn DecodePipeline>> {
        let mut pipeline = self.deps.factory.create()?;
        let bytes = self.deps.fetcher.fetch(track.preview_url()).await?;

        tokio::task::spawn_blocking(move || -> PlaybackResult<Box<dyn DecodePipeline>> {
            pipeline.write(&bytes)?;
            pipeline.finish()?;
            Ok(pipeline)
        })
        .await
        .map_err(|e| PlaybackError::Pipeline(format!("decode task failed: {}", e)))?
    }

    fn play(&self, track: Track) {
        log::info!(
            "[Session] Room {} now playing {} - {}",
            self.session.room_id,
            track.artist(),
            track.name()
        );
        self.deps.events.emit_session(SessionEvent::TrackStarted {
            room_id: self.session.room_id,
            session_id: self.session.id.clone(),
            track: track.clone(),
            timestamp: now_millis(),
        });
        *self.session.current.write() = Some(track);
        self.session.set_state(PlaybackState::Playing);
    }

    async fn finish(&self, reason: EndReason) {
        let session = &self.session;

        self.slot.lock().take();
        let dropped = session.queue.clear();
        *session.current.write() = None;
        session.set_state(PlaybackState::Stopped);
        session.cancel.cancel();

        // A closed provider means the transport is already gone
        if reason != EndReason::ProviderClosed {
            if let Err(err) = self.sink.disconnect().await {
                log::warn!("[Session] Disconnect failed in room {}: {}", session.room_id, err);
                self.report(&err);
            }
        }

        self.deps.registry.remove(session.room_id, &session.id);

        log::info!(
            "[Session] Session {} in room {} ended ({:?}, {} track(s) left)",
            session.id,
            session.room_id,
            reason,
            dropped
        );
        self.deps.events.emit_session(SessionEvent::Ended {
            room_id: session.room_id,
            session_id: session.id.clone(),
            reason,
            timestamp: now_millis(),
        });
    }

    fn report(&self, err: &PlaybackError) {
        (self.on_error)(err);
    }
}
