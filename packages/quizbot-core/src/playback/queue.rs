//! FIFO of tracks waiting to be played in one session.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::track::Track;

/// Thread-safe FIFO of pending tracks.
///
/// Pushes from the task seeding a quiz and pops from the playback driver may
/// happen concurrently. Each pushed track is popped at most once.
#[derive(Debug, Default)]
pub struct TrackQueue {
    tracks: Mutex<VecDeque<Track>>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends tracks in iteration order.
    pub fn push<I>(&self, tracks: I)
    where
        I: IntoIterator<Item = Track>,
    {
        self.tracks.lock().extend(tracks);
    }

    /// Removes and returns the head of the queue, or `None` when empty.
    pub fn pop(&self) -> Option<Track> {
        self.tracks.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.tracks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.lock().is_empty()
    }

    /// Drops every pending track, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut tracks = self.tracks.lock();
        let count = tracks.len();
        tracks.clear();
        count
    }
}
