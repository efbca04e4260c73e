//! Task spawning abstraction.
//!
//! Quiz playback runs detached from the command that started it. Services
//! spawn that work through [`TaskSpawner`] so the embedding application
//! decides which runtime owns it.

use std::future::Future;

/// Abstraction for spawning fire-and-forget background tasks.
///
/// The spawner offers no join or cancel handle. Work that must be stoppable
/// carries its own cancellation token.
pub trait TaskSpawner: Send + Sync {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Tokio-based spawner.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Creates a spawner on the current runtime's handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(future);
    }
}
