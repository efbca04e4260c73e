//! Seam between a playback session and the voice transport.
//!
//! The transport pulls frames from a [`FrameProvider`] at its own pace. The
//! session's provider reads from whichever pipeline currently sits in the
//! session's slot and turns pipeline boundaries into control signals.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::pipeline::{AudioFrame, DecodePipeline};
use super::{PlaybackError, PlaybackResult};

/// Source of frames attached to an [`AudioSink`].
pub trait FrameProvider: Send {
    /// Returns the next frame, or `None` when nothing is playing.
    fn provide_frame(&mut self) -> Option<AudioFrame>;

    /// Called by the sink when the underlying transport has gone away.
    fn close(&mut self);
}

/// Outbound audio of an established voice connection.
///
/// Encoding frames for the wire is the sink's concern.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Replaces the sink's frame provider.
    fn set_frame_provider(&self, provider: Box<dyn FrameProvider>);

    /// Leaves the voice channel.
    async fn disconnect(&self) -> PlaybackResult<()>;
}

/// The session's current pipeline; empty between tracks.
pub(crate) type PipelineSlot = Arc<Mutex<Option<Box<dyn DecodePipeline>>>>;

/// Control signals sent from the frame provider to the session driver.
#[derive(Debug)]
pub(crate) enum PipelineSignal {
    StreamEnded,
    ProviderClosed,
    Failed(PlaybackError),
}

/// Frame provider handed to the sink by a session.
pub(crate) struct SessionFrameProvider {
    slot: PipelineSlot,
    signals: mpsc::UnboundedSender<PipelineSignal>,
    closed: CancellationToken,
}

impl SessionFrameProvider {
    pub(crate) fn new(
        slot: PipelineSlot,
        signals: mpsc::UnboundedSender<PipelineSignal>,
        closed: CancellationToken,
    ) -> Self {
        Self {
            slot,
            signals,
            closed,
        }
    }

    fn signal(&self, signal: PipelineSignal) {
        // Receiver is gone once the session has ended
        let _ = self.signals.send(signal);
    }
}

impl FrameProvider for SessionFrameProvider {
    fn provide_frame(&mut self) -> Option<AudioFrame> {
        let mut slot = self.slot.lock();
        let pipeline = slot.as_mut()?;

        match pipeline.next_frame() {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                slot.take();
                drop(slot);
                self.signal(PipelineSignal::StreamEnded);
                None
            }
            Err(e) => {
                slot.take();
                drop(slot);
                self.signal(PipelineSignal::Failed(e));
                None
            }
        }
    }

    fn close(&mut self) {
        if self.closed.is_cancelled() {
            return;
        }
        self.slot.lock().take();
        self.closed.cancel();
        self.signal(PipelineSignal::ProviderClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::testing::FakePipeline;

    fn provider_with(
        pipeline: Option<FakePipeline>,
    ) -> (
        SessionFrameProvider,
        PipelineSlot,
        mpsc::UnboundedReceiver<PipelineSignal>,
        CancellationToken,
    ) {
        let slot: PipelineSlot = Arc::new(Mutex::new(
            pipeline.map(|p| Box::new(p) as Box<dyn DecodePipeline>),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = CancellationToken::new();
        let provider = SessionFrameProvider::new(slot.clone(), tx, closed.clone());
        (provider, slot, rx, closed)
    }

    #[test]
    fn empty_slot_provides_nothing() {
        let (mut provider, _slot, mut rx, _) = provider_with(None);
        assert!(provider.provide_frame().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn end_of_stream_is_signalled_once_and_slot_cleared() {
        let (mut provider, slot, mut rx, _) = provider_with(Some(FakePipeline::finished(2)));

        assert!(provider.provide_frame().is_some());
        assert!(provider.provide_frame().is_some());
        assert!(provider.provide_frame().is_none());
        assert!(provider.provide_frame().is_none());

        assert!(slot.lock().is_none());
        assert!(matches!(rx.try_recv(), Ok(PipelineSignal::StreamEnded)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn pipeline_error_is_forwarded() {
        let (mut provider, slot, mut rx, _) = provider_with(Some(FakePipeline::failing_read()));

        assert!(provider.provide_frame().is_none());
        assert!(slot.lock().is_none());
        assert!(matches!(rx.try_recv(), Ok(PipelineSignal::Failed(_))));
    }

    #[test]
    fn close_signals_provider_closed_once() {
        let (mut provider, slot, mut rx, closed) = provider_with(Some(FakePipeline::finished(5)));

        provider.close();
        provider.close();

        assert!(closed.is_cancelled());
        assert!(slot.lock().is_none());
        assert!(matches!(rx.try_recv(), Ok(PipelineSignal::ProviderClosed)));
        assert!(rx.try_recv().is_err());
    }
}
