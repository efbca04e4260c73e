//! Room → session index.
//!
//! Presence of an entry means "a quiz is running in this room". Entries are
//! inserted atomically and removed by the session's own teardown.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::session::PlaybackSession;
use crate::error::QuizError;
use crate::platform::RoomId;

/// Holds at most one [`PlaybackSession`] per room.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<RoomId, Arc<PlaybackSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `session` unless its room already has one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyRunning` when the room is taken.
    pub fn try_insert(&self, session: Arc<PlaybackSession>) -> Result<(), QuizError> {
        match self.sessions.entry(session.room_id()) {
            Entry::Occupied(_) => Err(QuizError::AlreadyRunning),
            Entry::Vacant(entry) => {
                log::debug!(
                    "[Registry] Registered session {} for room {}",
                    session.id(),
                    session.room_id()
                );
                entry.insert(session);
                Ok(())
            }
        }
    }

    pub fn get(&self, room_id: RoomId) -> Option<Arc<PlaybackSession>> {
        self.sessions.get(&room_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, room_id: RoomId) -> bool {
        self.sessions.contains_key(&room_id)
    }

    /// Removes the room's entry if it still belongs to `session_id`.
    ///
    /// A finished session never evicts a newer session of the same room.
    pub fn remove(&self, room_id: RoomId, session_id: &str) -> bool {
        let removed = self
            .sessions
            .remove_if(&room_id, |_, session| session.id() == session_id)
            .is_some();
        if removed {
            log::debug!("[Registry] Removed session {} for room {}", session_id, room_id);
        }
        removed
    }

    /// Asks the room's session to stop. Returns `false` if none is running.
    pub fn stop(&self, room_id: RoomId) -> bool {
        match self.get(room_id) {
            Some(session) => {
                session.stop();
                true
            }
            None => false,
        }
    }

    /// Asks every session to stop, returning how many were signalled.
    pub fn stop_all(&self) -> usize {
        let sessions: Vec<_> = self.sessions.iter().map(|e| e.value().clone()).collect();
        for session in &sessions {
            session.stop();
        }
        if !sessions.is_empty() {
            log::info!("[Registry] Stopping {} session(s)", sessions.len());
        }
        sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn rooms(&self) -> Vec<RoomId> {
        self.sessions.iter().map(|e| *e.key()).collect()
    }
}
