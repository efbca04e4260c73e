//! Session lifecycle events.
//!
//! This module provides:
//! - [`EventEmitter`] trait through which playback reports lifecycle changes
//! - [`SessionEvent`], the events themselves
//!
//! Events are informational. Nothing in the playback path waits on them.

mod emitter;

pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

use crate::platform::RoomId;
use crate::playback::{EndReason, Track};

/// Lifecycle events of a playback session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// The driver attached to the sink and is about to play.
    #[serde(rename_all = "camelCase")]
    Started {
        room_id: RoomId,
        session_id: String,
        /// Tracks waiting in the queue.
        queued: usize,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A track's pipeline was attached to the sink.
    #[serde(rename_all = "camelCase")]
    TrackStarted {
        room_id: RoomId,
        session_id: String,
        track: Track,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The session reached its terminal state.
    #[serde(rename_all = "camelCase")]
    Ended {
        room_id: RoomId,
        session_id: String,
        reason: EndReason,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

impl SessionEvent {
    pub fn room_id(&self) -> RoomId {
        match self {
            Self::Started { room_id, .. }
            | Self::TrackStarted { room_id, .. }
            | Self::Ended { room_id, .. } => *room_id,
        }
    }
}
