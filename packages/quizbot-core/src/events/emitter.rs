//! Event emitter abstraction for decoupling playback from observers.

use super::SessionEvent;

/// Trait for emitting session events without knowledge of who listens.
///
/// # Example
///
/// ```ignore
/// struct Announcer;
///
/// impl EventEmitter for Announcer {
///     fn emit_session(&self, event: SessionEvent) {
///         if let SessionEvent::TrackStarted { track, .. } = event {
///             println!("now playing {}", track.name());
///         }
///     }
/// }
/// ```
pub trait EventEmitter: Send + Sync {
    fn emit_session(&self, event: SessionEvent);
}

/// Discards every event.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_session(&self, _event: SessionEvent) {}
}

/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_session(&self, event: SessionEvent) {
        tracing::debug!(?event, "session_event");
    }
}
