//! Quizbot Core - playback engine and catalog client for the music quiz bot.
//!
//! The bot turns a playlist into a guessing game: it fetches track previews
//! from the music catalog, queues them, streams decoded audio into a voice
//! session and advances automatically as each preview finishes.
//!
//! # Architecture
//!
//! - [`catalog`]: Client-credentials token cache, playlist client, link parsing
//! - [`playback`]: Track queue, decode pipelines, sessions and their registry
//! - [`services`]: Start-quiz orchestration
//! - [`platform`]: Chat-platform seams (interaction, voice gateway, command)
//! - [`events`]: Session lifecycle events
//! - [`config`]: Core configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`TaskSpawner`](runtime::TaskSpawner): Spawning detached playback
//! - [`EventEmitter`](events::EventEmitter): Observing session lifecycle
//! - [`TokenSource`](catalog::TokenSource) and
//!   [`PlaylistSource`](catalog::PlaylistSource): Catalog access
//! - [`QuizInteraction`](platform::QuizInteraction) and
//!   [`VoiceGateway`](platform::VoiceGateway): The chat platform
//! - [`AudioSink`](playback::AudioSink),
//!   [`PipelineFactory`](playback::PipelineFactory) and
//!   [`PreviewFetcher`](playback::PreviewFetcher): Audio in and out

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod platform;
pub mod playback;
pub mod protocol_constants;
pub mod runtime;
pub mod services;
pub mod utils;

// Re-export commonly used types at the crate root
pub use catalog::{
    CatalogClient, CatalogError, CatalogLink, CatalogResult, LinkKind, PlaylistSource, TokenCache,
    TokenSource,
};
pub use config::{CatalogConfig, Config, FailurePolicy};
pub use error::{ErrorCode, QuizError, QuizResult};
pub use events::{EventEmitter, LoggingEventEmitter, NoopEventEmitter, SessionEvent};
pub use platform::{
    quiz_command, ChannelId, CommandDefinition, PlatformError, QuizInteraction, RoomId, UserId,
    VoiceGateway,
};
pub use playback::{
    AudioFrame, AudioSink, EndReason, FrameProvider, PlaybackError, PlaybackResult,
    PlaybackSession, PlaybackState, SessionRegistry, Track, TrackQueue,
};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use services::QuizService;
pub use utils::now_millis;

// Re-export bootstrap types
pub use bootstrap::{bootstrap_services, BootstrappedServices};
