//! In-memory collaborators for playback tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::pipeline::{AudioFrame, DecodePipeline, PipelineFactory};
use super::sink::{AudioSink, FrameProvider};
use super::{PlaybackError, PlaybackResult};
use crate::events::{EventEmitter, SessionEvent};

/// Pipeline producing one silent frame per input byte.
///
/// Input equal to `b"corrupt"` fails on finish.
#[derive(Default)]
pub(crate) struct FakePipeline {
    input: Vec<u8>,
    remaining: usize,
    finished: bool,
    fail_read: bool,
}

impl FakePipeline {
    pub(crate) fn finished(frames: usize) -> Self {
        Self {
            remaining: frames,
            finished: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_read() -> Self {
        Self {
            finished: true,
            fail_read: true,
            ..Self::default()
        }
    }
}

impl DecodePipeline for FakePipeline {
    fn write(&mut self, data: &[u8]) -> PlaybackResult<()> {
        self.input.extend_from_slice(data);
        Ok(())
    }

    fn finish(&mut self) -> PlaybackResult<()> {
        if self.input == b"corrupt" {
            return Err(PlaybackError::Decode("corrupt preview".into()));
        }
        self.remaining = self.input.len();
        self.finished = true;
        Ok(())
    }

    fn next_frame(&mut self) -> PlaybackResult<Option<AudioFrame>> {
        if self.fail_read {
            return Err(PlaybackError::Pipeline("read failed".into()));
        }
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(AudioFrame::silence()))
    }
}

#[derive(Default)]
pub(crate) struct FakePipelineFactory {
    pub(crate) created: AtomicUsize,
}

impl PipelineFactory for FakePipelineFactory {
    fn create(&self) -> PlaybackResult<Box<dyn DecodePipeline>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePipeline::default()))
    }
}

/// Serves preview bodies by URL; unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    bodies: HashMap<String, Bytes>,
    pub(crate) fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub(crate) fn with(mut self, url: &str, body: &'static [u8]) -> Self {
        self.bodies.insert(url.to_string(), Bytes::from_static(body));
        self
    }
}

#[async_trait]
impl super::fetch::PreviewFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> PlaybackResult<Bytes> {
        self.fetched.lock().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or(PlaybackError::FetchStatus(404))
    }
}

/// Sink that only pulls frames when a test asks it to.
#[derive(Default)]
pub(crate) struct FakeSink {
    provider: Mutex<Option<Box<dyn FrameProvider>>>,
    pub(crate) disconnects: AtomicUsize,
    /// Makes `disconnect` fail after counting the call.
    pub(crate) fail_disconnect: AtomicBool,
}

impl FakeSink {
    pub(crate) fn has_provider(&self) -> bool {
        self.provider.lock().is_some()
    }

    /// Pulls frames until the provider runs dry, returning how many it got.
    pub(crate) fn pump(&self) -> usize {
        let mut guard = self.provider.lock();
        let Some(provider) = guard.as_mut() else {
            return 0;
        };
        let mut frames = 0;
        while provider.provide_frame().is_some() {
            frames += 1;
        }
        frames
    }

    pub(crate) fn drop_transport(&self) {
        if let Some(provider) = self.provider.lock().as_mut() {
            provider.close();
        }
    }

    pub(crate) fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSink for FakeSink {
    fn set_frame_provider(&self, provider: Box<dyn FrameProvider>) {
        *self.provider.lock() = Some(provider);
    }

    async fn disconnect(&self) -> PlaybackResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(PlaybackError::Sink("voice gateway went away".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingEmitter {
    pub(crate) events: Mutex<Vec<SessionEvent>>,
}

impl EventEmitter for RecordingEmitter {
    fn emit_session(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

/// Polls `condition` until it holds, failing the test after about two seconds.
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}
