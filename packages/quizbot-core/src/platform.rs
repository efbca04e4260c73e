//! Chat-platform collaborators.
//!
//! The gateway, command dispatch and voice handshake live outside this crate.
//! The quiz flow only needs the narrow surface defined here.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::playback::AudioSink;
use crate::protocol_constants::{PLAYLIST_OPTION_NAME, QUIZ_COMMAND_NAME, START_SUBCOMMAND_NAME};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// A voice-enabled space hosting at most one quiz (a guild).
    RoomId
);
snowflake!(UserId);
snowflake!(ChannelId);

/// Failure reported by a platform collaborator.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One invocation of the quiz command.
#[async_trait]
pub trait QuizInteraction: Send + Sync {
    fn room_id(&self) -> RoomId;

    fn user_id(&self) -> UserId;

    /// Sends a reply only the invoking user can see.
    async fn reply_ephemeral(&self, content: &str) -> Result<(), PlatformError>;

    /// Acknowledges the command; the response is filled in later.
    async fn defer(&self) -> Result<(), PlatformError>;

    /// Replaces the content of the (deferred) response.
    async fn edit_response(&self, content: &str) -> Result<(), PlatformError>;
}

/// Voice state lookups and connections.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// The voice channel `user` currently sits in, if any.
    fn voice_channel_of(&self, room: RoomId, user: UserId) -> Option<ChannelId>;

    /// Joins `channel` and resolves once the connection is ready.
    async fn connect(
        &self,
        room: RoomId,
        channel: ChannelId,
    ) -> Result<Arc<dyn AudioSink>, PlatformError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Command Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Platform-neutral description of a slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the command may be used in direct messages.
    pub dm_permission: bool,
    pub subcommands: Vec<SubcommandDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<StringOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringOption {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// The `music-quiz` command with its `start <playlist>` subcommand.
///
/// A missing `playlist` value is treated like an unparsable link.
pub fn quiz_command() -> CommandDefinition {
    CommandDefinition {
        name: QUIZ_COMMAND_NAME,
        description: "Starts a music quiz",
        dm_permission: false,
        subcommands: vec![SubcommandDefinition {
            name: START_SUBCOMMAND_NAME,
            description: "Starts a new music quiz",
            options: vec![StringOption {
                name: PLAYLIST_OPTION_NAME,
                description: "The playlist to use",
                required: false,
            }],
        }],
    }
}
