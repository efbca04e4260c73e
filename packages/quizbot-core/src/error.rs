//! Centralized error types for the quiz bot core.
//!
//! Subsystem errors ([`CatalogError`], [`PlaybackError`], [`PlatformError`])
//! carry technical detail. [`QuizError`] is what a quiz request fails with;
//! each variant maps to a machine-readable code and the short text shown to
//! the invoking user.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, LinkKind};
use crate::platform::PlatformError;
use crate::playback::PlaybackError;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

impl ErrorCode for CatalogError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::Status(_) => "http_error_status",
            Self::TokenRejected(_, _) => "token_rejected",
            Self::Decode(_) => "catalog_decode_failed",
        }
    }
}

impl ErrorCode for PlaybackError {
    fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "preview_fetch_failed",
            Self::FetchStatus(_) => "preview_http_error_status",
            Self::Decode(_) => "decode_failed",
            Self::Pipeline(_) => "pipeline_error",
            Self::Sink(_) => "audio_sink_error",
        }
    }
}

/// Application-wide error type for quiz requests.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum QuizError {
    /// The room already has a session.
    #[error("A quiz is already running in this room")]
    AlreadyRunning,

    /// The invoking user is not connected to any voice channel.
    #[error("User is not in a voice channel")]
    NotInVoiceChannel,

    /// The argument contains no recognizable catalog link.
    #[error("Invalid catalog link")]
    InvalidLink,

    /// The link points to something other than a playlist.
    #[error("Unsupported link type: {0}")]
    UnsupportedLinkType(String),

    /// The playlist had no track with a preview.
    #[error("No playable tracks")]
    NoPlayableTracks,

    /// The catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Joining the voice channel failed or timed out.
    #[error("Voice connect failed: {0}")]
    VoiceConnect(String),

    /// The bot is shutting down and accepts no new quizzes.
    #[error("Shutting down")]
    ShuttingDown,

    /// A chat-platform call failed.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizError {
    pub fn unsupported(kind: LinkKind) -> Self {
        Self::UnsupportedLinkType(kind.to_string())
    }

    /// Returns a machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "already_running",
            Self::NotInVoiceChannel => "not_in_voice_channel",
            Self::InvalidLink => "invalid_link",
            Self::UnsupportedLinkType(_) => "unsupported_link_type",
            Self::NoPlayableTracks => "no_playable_tracks",
            Self::Catalog(_) => "catalog_error",
            Self::VoiceConnect(_) => "voice_connect_failed",
            Self::ShuttingDown => "shutting_down",
            Self::Platform(_) => "platform_error",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Text shown to the user who issued the command.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "A quiz is already running in this server.",
            Self::NotInVoiceChannel => "You must be in a voice channel to start a quiz.",
            Self::InvalidLink => "Unable to parse your spotify link.",
            Self::UnsupportedLinkType(_) => "Unsupported link type.",
            Self::NoPlayableTracks | Self::Catalog(_) => "Error getting playlist tracks.",
            Self::VoiceConnect(_) => "Error connecting to voice channel.",
            Self::ShuttingDown => "The bot is restarting, try again in a moment.",
            Self::Platform(_) | Self::Configuration(_) | Self::Internal(_) => {
                "Something went wrong while starting the quiz."
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::catalog::CatalogResult;
pub use crate::playback::PlaybackResult;

/// Convenient Result alias for quiz requests.
pub type QuizResult<T> = Result<T, QuizError>;

impl From<CatalogError> for QuizError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err.to_string())
    }
}

impl From<PlatformError> for QuizError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err.to_string())
    }
}
