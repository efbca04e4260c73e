//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by the music catalog's public API, the voice
//! transport's audio format, or the token refresh contract. Tunable values
//! live in [`crate::config::Config`] instead.

// ─────────────────────────────────────────────────────────────────────────────
// Catalog Endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Base URL of the catalog's accounts service (token endpoint host).
pub const CATALOG_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Base URL of the catalog's Web API.
pub const CATALOG_API_URL: &str = "https://api.spotify.com/v1";

/// Path of the client-credentials token endpoint, relative to the accounts URL.
pub const TOKEN_PATH: &str = "/api/token";

/// Field selector sent with playlist track requests.
///
/// Only artwork, artist name, track name, id and preview URL are needed for a quiz.
pub const PLAYLIST_TRACK_FIELDS: &str =
    "items(track.id,track.album.images,track.artists.name,track.name,track.preview_url)";

// ─────────────────────────────────────────────────────────────────────────────
// Token Refresh
// ─────────────────────────────────────────────────────────────────────────────

/// Total number of token requests made before giving up.
pub const TOKEN_REFRESH_ATTEMPTS: usize = 5;

/// Delay between two token requests (milliseconds).
pub const TOKEN_RETRY_DELAY_MS: u64 = 1000;

/// Safety margin subtracted from the server-provided TTL (seconds).
///
/// A token is never handed out during the last 10 seconds of its lifetime.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 10;

/// Upper bound on how long a token is cached, whatever TTL the server announces (seconds).
pub const TOKEN_MAX_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Timeout applied by the shared HTTP client (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// How long shutdown waits for stopped sessions to leave their voice channels (seconds).
pub const SHUTDOWN_GRACE_SECS: u64 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Voice Audio Format
// ─────────────────────────────────────────────────────────────────────────────

/// Sample rate expected by the voice transport (Hz).
pub const VOICE_SAMPLE_RATE: u32 = 48_000;

/// Channel count expected by the voice transport.
pub const VOICE_CHANNELS: usize = 2;

/// Duration of one audio frame (milliseconds).
pub const FRAME_DURATION_MS: u32 = 20;

/// Samples per channel in one frame (48 kHz × 20 ms).
pub const FRAME_SAMPLES_PER_CHANNEL: usize =
    (VOICE_SAMPLE_RATE / 1000 * FRAME_DURATION_MS) as usize;

/// Interleaved samples in one frame.
pub const FRAME_SAMPLES: usize = FRAME_SAMPLES_PER_CHANNEL * VOICE_CHANNELS;

// ─────────────────────────────────────────────────────────────────────────────
// Application Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Name of the slash command exposed to the chat platform.
pub const QUIZ_COMMAND_NAME: &str = "music-quiz";

/// Name of the subcommand that starts a quiz.
pub const START_SUBCOMMAND_NAME: &str = "start";

/// Name of the string option carrying the catalog link.
pub const PLAYLIST_OPTION_NAME: &str = "playlist";
