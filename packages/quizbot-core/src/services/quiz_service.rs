//! Start-quiz request handling.
//!
//! [`QuizService::start_quiz`] answers the command synchronously up to the
//! point where tracks are queued. Voice connect and playback then continue on
//! a detached task; from there on failures reach the user only as best-effort
//! edits of the deferred response.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogLink, LinkKind, PlaylistSource};
use crate::config::Config;
use crate::error::{QuizError, QuizResult};
use crate::platform::{ChannelId, QuizInteraction, RoomId, VoiceGateway};
use crate::playback::{
    ErrorHandler, PlaybackDeps, PlaybackError, PlaybackSession, SessionDriver, SessionRegistry,
    Track,
};
use crate::runtime::{TaskSpawner, TokioSpawner};

/// Reply edited into the response when playback fails mid-quiz.
const PLAYBACK_ERROR_MESSAGE: &str = "Something went wrong while playing the quiz.";

/// Orchestrates quiz starts across catalog, registry and voice.
pub struct QuizService {
    catalog: Arc<dyn PlaylistSource>,
    voice: Arc<dyn VoiceGateway>,
    playback: PlaybackDeps,
    spawner: TokioSpawner,
    connect_timeout: Duration,
    report_playback_errors: bool,
    shutdown: CancellationToken,
}

impl QuizService {
    pub fn new(
        catalog: Arc<dyn PlaylistSource>,
        voice: Arc<dyn VoiceGateway>,
        playback: PlaybackDeps,
        spawner: TokioSpawner,
        shutdown: CancellationToken,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            voice,
            playback,
            spawner,
            connect_timeout: config.voice_connect_timeout(),
            report_playback_errors: config.report_playback_errors,
            shutdown,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.playback.registry
    }

    /// Handles `/music-quiz start <link>`.
    ///
    /// On success the room's session is registered, its queue seeded with the
    /// shuffled playable tracks, and a background task spawned to connect and
    /// play. The caller must not assume that task has completed (or even
    /// started) when this returns.
    ///
    /// # Errors
    ///
    /// Every error has already been reported to the user: preconditions as an
    /// ephemeral reply, later failures as an edit of the deferred response.
    pub async fn start_quiz(
        &self,
        interaction: Arc<dyn QuizInteraction>,
        link: Option<&str>,
    ) -> QuizResult<Arc<PlaybackSession>> {
        let room = interaction.room_id();
        let registry = &self.playback.registry;

        if self.shutdown.is_cancelled() {
            return reject(interaction.as_ref(), QuizError::ShuttingDown).await;
        }

        if registry.contains(room) {
            return reject(interaction.as_ref(), QuizError::AlreadyRunning).await;
        }

        let Some(channel) = self.voice.voice_channel_of(room, interaction.user_id()) else {
            return reject(interaction.as_ref(), QuizError::NotInVoiceChannel).await;
        };

        let Some(link) = link.and_then(CatalogLink::parse) else {
            return reject(interaction.as_ref(), QuizError::InvalidLink).await;
        };

        // Reserve the room before any slow work so concurrent starts lose here
        let session = PlaybackSession::new(room);
        if let Err(err) = registry.try_insert(session.clone()) {
            return reject(interaction.as_ref(), err).await;
        }

        if let Err(err) = interaction.defer().await {
            registry.remove(room, session.id());
            log::warn!("[Quiz] Failed to defer response in room {}: {}", room, err);
            return Err(err.into());
        }

        let tracks = match self.resolve_tracks(&link).await {
            Ok(tracks) => tracks,
            Err(err) => {
                registry.remove(room, session.id());
                log::info!("[Quiz] Not starting quiz in room {}: {}", room, err);
                edit(interaction.as_ref(), err.user_message()).await;
                return Err(err);
            }
        };

        // Stopped while the playlist was loading
        if self.shutdown.is_cancelled() {
            session.stop();
        }
        if session.is_stopping() {
            registry.remove(room, session.id());
            log::info!("[Quiz] Quiz in room {} stopped before connecting", room);
            return Ok(session);
        }

        log::info!(
            "[Quiz] Starting quiz in room {} with {} track(s) from {} {}",
            room,
            tracks.len(),
            link.kind,
            link.id
        );
        session.queue().push(tracks);

        self.spawn_playback(session.clone(), channel, interaction);
        Ok(session)
    }

    /// Stops the quiz running in `room`, if any.
    pub fn stop_quiz(&self, room: RoomId) -> bool {
        self.playback.registry.stop(room)
    }

    /// Turns a link into the shuffled list of playable tracks.
    async fn resolve_tracks(&self, link: &CatalogLink) -> QuizResult<Vec<Track>> {
        match link.kind {
            LinkKind::Playlist => {
                let items = self.catalog.playlist_tracks(&link.id).await?;
                let mut tracks = Track::playable(&items);
                log::debug!(
                    "[Quiz] Playlist {}: {} of {} item(s) have previews",
                    link.id,
                    tracks.len(),
                    items.len()
                );
                if tracks.is_empty() {
                    return Err(QuizError::NoPlayableTracks);
                }
                tracks.shuffle(&mut rand::rng());
                Ok(tracks)
            }
            other => Err(QuizError::unsupported(other)),
        }
    }

    fn spawn_playback(
        &self,
        session: Arc<PlaybackSession>,
        channel: ChannelId,
        interaction: Arc<dyn QuizInteraction>,
    ) {
        let voice = Arc::clone(&self.voice);
        let deps = self.playback.clone();
        let timeout = self.connect_timeout;
        let on_error = self.error_handler(Arc::clone(&interaction));

        self.spawner.spawn(async move {
            let room = session.room_id();

            let connect = tokio::time::timeout(timeout, voice.connect(room, channel));

            let sink = tokio::select! {
                biased;

                _ = session.cancelled() => {
                    log::info!("[Quiz] Quiz in room {} stopped while connecting", room);
                    session.queue().clear();
                    deps.registry.remove(room, session.id());
                    return;
                }

                result = connect => match result {
                    Ok(Ok(sink)) => sink,
                    Ok(Err(err)) => {
                        let err = QuizError::VoiceConnect(err.0);
                        release(&deps, &session, interaction.as_ref(), err).await;
                        return;
                    }
                    Err(_) => {
                        let err = QuizError::VoiceConnect(format!("timed out after {:?}", timeout));
                        release(&deps, &session, interaction.as_ref(), err).await;
                        return;
                    }
                },
            };

            SessionDriver::new(session, sink, deps, on_error).run().await;
        });
    }

    /// Logs playback errors and optionally reflects them in the response.
    fn error_handler(&self, interaction: Arc<dyn QuizInteraction>) -> ErrorHandler {
        let report = self.report_playback_errors;
        let spawner = self.spawner.clone();

        Arc::new(move |err: &PlaybackError| {
            log::error!(
                "[Quiz] Error in quiz in room {}: {}",
                interaction.room_id(),
                err
            );
            if report {
                let interaction = Arc::clone(&interaction);
                spawner.spawn(async move {
                    edit(interaction.as_ref(), PLAYBACK_ERROR_MESSAGE).await;
                });
            }
        })
    }
}

/// Answers a failed precondition with an ephemeral reply.
async fn reject<T>(interaction: &dyn QuizInteraction, err: QuizError) -> QuizResult<T> {
    log::debug!(
        "[Quiz] Rejected start in room {}: {}",
        interaction.room_id(),
        err
    );
    if let Err(reply_err) = interaction.reply_ephemeral(err.user_message()).await {
        log::warn!("[Quiz] Failed to send reply: {}", reply_err);
    }
    Err(err)
}

/// Best-effort edit of the deferred response.
async fn edit(interaction: &dyn QuizInteraction, content: &str) {
    if let Err(err) = interaction.edit_response(content).await {
        log::warn!(
            "[Quiz] Failed to edit response in room {}: {}",
            interaction.room_id(),
            err
        );
    }
}

/// Gives up a reserved session whose voice connection never came up.
async fn release(
    deps: &PlaybackDeps,
    session: &PlaybackSession,
    interaction: &dyn QuizInteraction,
    err: QuizError,
) {
    log::error!("[Quiz] Room {}: {}", session.room_id(), err);
    session.stop();
    session.queue().clear();
    deps.registry.remove(session.room_id(), session.id());
    edit(interaction, err.user_message()).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{CatalogTrack, PlaylistItem};
    use crate::catalog::{CatalogError, CatalogResult};
    use crate::config::FailurePolicy;
    use crate::events::NoopEventEmitter;
    use crate::platform::{PlatformError, UserId};
    use crate::playback::testing::{wait_until, FakeFetcher, FakePipelineFactory, FakeSink};
    use crate::playback::{AudioSink, PlaybackState};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const ROOM: RoomId = RoomId(100);
    const USER: UserId = UserId(7);
    const PLAYLIST: &str = "https://open.spotify.com/playlist/37i9dQZF1";

    // ─────────────────────────────────────────────────────────────────────────
    // Fakes
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Reply {
        Ephemeral(String),
        Deferred,
        Edit(String),
    }

    #[derive(Default)]
    struct FakeInteraction {
        replies: Mutex<Vec<Reply>>,
    }

    impl FakeInteraction {
        fn replies(&self) -> Vec<Reply> {
            self.replies.lock().clone()
        }
    }

    #[async_trait]
    impl QuizInteraction for FakeInteraction {
        fn room_id(&self) -> RoomId {
            ROOM
        }

        fn user_id(&self) -> UserId {
            USER
        }

        async fn reply_ephemeral(&self, content: &str) -> Result<(), PlatformError> {
            self.replies.lock().push(Reply::Ephemeral(content.into()));
            Ok(())
        }

        async fn defer(&self) -> Result<(), PlatformError> {
            self.replies.lock().push(Reply::Deferred);
            Ok(())
        }

        async fn edit_response(&self, content: &str) -> Result<(), PlatformError> {
            self.replies.lock().push(Reply::Edit(content.into()));
            Ok(())
        }
    }

    enum ConnectBehavior {
        Succeed,
        Fail,
        /// Wait for the gate before succeeding.
        Gated(Arc<Notify>),
        Hang,
    }

    struct FakeVoice {
        in_channel: bool,
        behavior: ConnectBehavior,
        sink: Arc<FakeSink>,
        connects: AtomicUsize,
    }

    impl FakeVoice {
        fn new(behavior: ConnectBehavior) -> Self {
            Self {
                in_channel: true,
                behavior,
                sink: Arc::new(FakeSink::default()),
                connects: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VoiceGateway for FakeVoice {
        fn voice_channel_of(&self, room: RoomId, user: UserId) -> Option<ChannelId> {
            assert_eq!((room, user), (ROOM, USER));
            self.in_channel.then_some(ChannelId(55))
        }

        async fn connect(
            &self,
            _room: RoomId,
            _channel: ChannelId,
        ) -> Result<Arc<dyn AudioSink>, PlatformError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                ConnectBehavior::Succeed => {}
                ConnectBehavior::Fail => return Err(PlatformError::new("handshake failed")),
                ConnectBehavior::Gated(gate) => gate.notified().await,
                ConnectBehavior::Hang => std::future::pending::<()>().await,
            }
            Ok(self.sink.clone())
        }
    }

    struct FakeCatalog {
        result: Result<Vec<PlaylistItem>, u16>,
        calls: AtomicUsize,
        /// When set, requests wait for the gate before answering.
        gate: Mutex<Option<Arc<Notify>>>,
    }

    #[async_trait]
    impl PlaylistSource for FakeCatalog {
        async fn playlist_tracks(&self, playlist_id: &str) -> CatalogResult<Vec<PlaylistItem>> {
            assert_eq!(playlist_id, "37i9dQZF1");
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.result.clone().map_err(CatalogError::Status)
        }
    }

    fn item(id: &str, preview: bool) -> PlaylistItem {
        PlaylistItem {
            track: Some(CatalogTrack {
                id: Some(id.into()),
                name: format!("Song {id}"),
                preview_url: preview.then(|| format!("https://p/{id}")),
                ..Default::default()
            }),
        }
    }

    fn playlist() -> Vec<PlaylistItem> {
        vec![
            item("1", true),
            item("2", false),
            item("3", true),
            item("4", true),
        ]
    }

    fn previews() -> FakeFetcher {
        FakeFetcher::default()
            .with("https://p/1", b"a")
            .with("https://p/3", b"bb")
            .with("https://p/4", b"ccc")
    }

    struct Harness {
        service: QuizService,
        voice: Arc<FakeVoice>,
        catalog: Arc<FakeCatalog>,
        interaction: Arc<FakeInteraction>,
        shutdown: CancellationToken,
    }

    impl Harness {
        fn new(voice: FakeVoice, items: Result<Vec<PlaylistItem>, u16>, fetcher: FakeFetcher) -> Self {
            let voice = Arc::new(voice);
            let catalog = Arc::new(FakeCatalog {
                result: items,
                calls: AtomicUsize::new(0),
                gate: Mutex::new(None),
            });
            let deps = PlaybackDeps {
                factory: Arc::new(FakePipelineFactory::default()),
                fetcher: Arc::new(fetcher),
                registry: Arc::new(SessionRegistry::new()),
                events: Arc::new(NoopEventEmitter),
                policy: FailurePolicy::Stop,
            };
            let shutdown = CancellationToken::new();
            let service = QuizService::new(
                catalog.clone(),
                voice.clone(),
                deps,
                TokioSpawner::current(),
                shutdown.clone(),
                &Config::default(),
            );
            Self {
                service,
                voice,
                catalog,
                interaction: Arc::new(FakeInteraction::default()),
                shutdown,
            }
        }

        async fn start(&self, link: Option<&str>) -> QuizResult<Arc<PlaybackSession>> {
            self.service.start_quiz(self.interaction.clone(), link).await
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Happy Path
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn start_queues_playable_tracks_and_plays_them_out() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), previews());

        let session = h.start(Some(PLAYLIST)).await.unwrap();
        assert_eq!(session.room_id(), ROOM);
        assert_eq!(h.interaction.replies(), vec![Reply::Deferred]);
        assert_eq!(h.service.registry().get(ROOM).unwrap().id(), session.id());

        let sink = h.voice.sink.clone();
        let mut played: Vec<String> = Vec::new();
        for _ in 0..3 {
            let s = session.clone();
            let previous = played.last().cloned();
            wait_until(|| {
                s.state() == PlaybackState::Playing
                    && s.current_track().map(|t| t.id().to_string()) != previous
            })
            .await;
            played.push(session.current_track().unwrap().id().to_string());
            sink.pump();
        }

        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;
        played.sort();
        assert_eq!(played, vec!["1", "3", "4"]);
        assert_eq!(sink.disconnect_count(), 1);
        assert_eq!(h.voice.connects.load(Ordering::SeqCst), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preconditions
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn second_start_is_rejected_before_connecting() {
        let gate = Arc::new(Notify::new());
        let h = Harness::new(
            FakeVoice::new(ConnectBehavior::Gated(gate.clone())),
            Ok(playlist()),
            previews(),
        );

        h.start(Some(PLAYLIST)).await.unwrap();
        let err = h.start(Some(PLAYLIST)).await.unwrap_err();

        assert!(matches!(err, QuizError::AlreadyRunning));
        assert_eq!(
            h.interaction.replies(),
            vec![
                Reply::Deferred,
                Reply::Ephemeral("A quiz is already running in this server.".into()),
            ]
        );
        assert!(h.voice.connects.load(Ordering::SeqCst) <= 1);
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.service.registry().len(), 1);

        h.service.stop_quiz(ROOM);
        gate.notify_one();
        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;
    }

    #[tokio::test]
    async fn concurrent_starts_admit_one() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Hang), Ok(playlist()), previews());

        let (a, b) = tokio::join!(h.start(Some(PLAYLIST)), h.start(Some(PLAYLIST)));

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(h.service.registry().len(), 1);
    }

    #[tokio::test]
    async fn start_after_shutdown_is_rejected() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), previews());
        h.shutdown.cancel();

        let err = h.start(Some(PLAYLIST)).await.unwrap_err();

        assert!(matches!(err, QuizError::ShuttingDown));
        assert_eq!(
            h.interaction.replies(),
            vec![Reply::Ephemeral(
                "The bot is restarting, try again in a moment.".into()
            )]
        );
        assert!(h.service.registry().is_empty());
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn user_outside_voice_is_rejected() {
        let mut voice = FakeVoice::new(ConnectBehavior::Succeed);
        voice.in_channel = false;
        let h = Harness::new(voice, Ok(playlist()), previews());

        let err = h.start(Some(PLAYLIST)).await.unwrap_err();

        assert!(matches!(err, QuizError::NotInVoiceChannel));
        assert_eq!(
            h.interaction.replies(),
            vec![Reply::Ephemeral(
                "You must be in a voice channel to start a quiz.".into()
            )]
        );
        assert!(h.service.registry().is_empty());
    }

    #[tokio::test]
    async fn unparsable_or_missing_link_is_rejected() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), previews());

        assert!(matches!(
            h.start(Some("not a link")).await,
            Err(QuizError::InvalidLink)
        ));
        assert!(matches!(h.start(None).await, Err(QuizError::InvalidLink)));
        assert_eq!(
            h.interaction.replies()[0],
            Reply::Ephemeral("Unable to parse your spotify link.".into())
        );
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Failures After Defer
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn non_playlist_link_is_unsupported() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), previews());

        let err = h
            .start(Some("https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy"))
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::UnsupportedLinkType(ref kind) if kind == "album"));
        assert_eq!(
            h.interaction.replies(),
            vec![Reply::Deferred, Reply::Edit("Unsupported link type.".into())]
        );
        assert!(h.service.registry().is_empty());
        assert_eq!(h.voice.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn catalog_error_releases_room() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Err(404), previews());

        let err = h.start(Some(PLAYLIST)).await.unwrap_err();

        assert!(matches!(err, QuizError::Catalog(_)));
        assert_eq!(
            h.interaction.replies().last(),
            Some(&Reply::Edit("Error getting playlist tracks.".into()))
        );
        assert!(h.service.registry().is_empty());
    }

    #[tokio::test]
    async fn playlist_without_previews_is_rejected() {
        let h = Harness::new(
            FakeVoice::new(ConnectBehavior::Succeed),
            Ok(vec![item("1", false), item("2", false)]),
            previews(),
        );

        let err = h.start(Some(PLAYLIST)).await.unwrap_err();

        assert!(matches!(err, QuizError::NoPlayableTracks));
        assert_eq!(
            h.interaction.replies().last(),
            Some(&Reply::Edit("Error getting playlist tracks.".into()))
        );
        assert!(h.service.registry().is_empty());
    }

    #[tokio::test]
    async fn voice_connect_failure_releases_room() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Fail), Ok(playlist()), previews());

        let session = h.start(Some(PLAYLIST)).await.unwrap();

        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;
        assert!(session.queue().is_empty());

        let interaction = h.interaction.clone();
        wait_until(|| interaction.replies().len() == 2).await;
        assert_eq!(
            h.interaction.replies()[1],
            Reply::Edit("Error connecting to voice channel.".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn voice_connect_is_bounded_by_timeout() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Hang), Ok(playlist()), previews());

        h.start(Some(PLAYLIST)).await.unwrap();
        assert!(h.service.registry().contains(ROOM));

        tokio::time::sleep(Duration::from_secs(11)).await;
        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;
        assert_eq!(
            h.interaction.replies().last(),
            Some(&Reply::Edit("Error connecting to voice channel.".into()))
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stopping Before Playback
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn stop_while_connecting_frees_room_immediately() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Hang), Ok(playlist()), previews());

        let session = h.start(Some(PLAYLIST)).await.unwrap();
        let voice = h.voice.clone();
        wait_until(|| voice.connects.load(Ordering::SeqCst) == 1).await;

        let stopped_at = tokio::time::Instant::now();
        assert!(h.service.stop_quiz(ROOM));
        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;

        assert!(stopped_at.elapsed() < Duration::from_secs(1));
        assert!(session.queue().is_empty());
        assert!(!h.voice.sink.has_provider());
        assert_eq!(h.interaction.replies(), vec![Reply::Deferred]);

        // The room is free again well before the connect timeout
        h.start(Some(PLAYLIST)).await.unwrap();
        assert!(h.service.registry().contains(ROOM));
    }

    #[tokio::test]
    async fn stop_while_loading_playlist_never_joins_voice() {
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), previews());
        let gate = Arc::new(Notify::new());
        *h.catalog.gate.lock() = Some(gate.clone());

        let stop = async {
            let catalog = h.catalog.clone();
            wait_until(|| catalog.calls.load(Ordering::SeqCst) == 1).await;
            assert!(h.service.stop_quiz(ROOM));
            gate.notify_one();
        };
        let (result, ()) = tokio::join!(h.start(Some(PLAYLIST)), stop);

        let session = result.unwrap();
        assert!(session.is_stopping());
        assert!(session.queue().is_empty());
        assert!(h.service.registry().is_empty());
        tokio::task::yield_now().await;
        assert_eq!(h.voice.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn playback_errors_are_reported_to_user() {
        // No previews are served, so the first track fails to fetch
        let fetcher = FakeFetcher::default();
        let h = Harness::new(FakeVoice::new(ConnectBehavior::Succeed), Ok(playlist()), fetcher);

        h.start(Some(PLAYLIST)).await.unwrap();

        let registry = h.service.registry().clone();
        wait_until(|| registry.is_empty()).await;
        let interaction = h.interaction.clone();
        wait_until(|| interaction.replies().len() == 2).await;
        assert_eq!(
            h.interaction.replies()[1],
            Reply::Edit(PLAYBACK_ERROR_MESSAGE.into())
        );
        assert_eq!(h.voice.sink.disconnect_count(), 1);
    }
}
