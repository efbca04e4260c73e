//! Application bootstrap and dependency wiring.
//!
//! This module is the composition root: the token cache, catalog client,
//! session registry and playback collaborators are created here once and
//! shared by reference. Nothing in the crate is a process-wide singleton, so
//! tests build isolated instances the same way.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogClient, ClientCredentials, TokenCache};
use crate::config::Config;
use crate::error::{QuizError, QuizResult};
use crate::events::EventEmitter;
use crate::platform::VoiceGateway;
use crate::playback::{HttpPreviewFetcher, Mp3PipelineFactory, PlaybackDeps, SessionRegistry};
use crate::protocol_constants::{HTTP_TIMEOUT_SECS, SHUTDOWN_GRACE_SECS};
use crate::runtime::TokioSpawner;
use crate::services::QuizService;

/// Container for all bootstrapped services.
#[derive(Clone)]
pub struct BootstrappedServices {
    /// Client-credentials token cache shared by every catalog request.
    pub tokens: Arc<TokenCache>,
    /// Catalog metadata client.
    pub catalog: Arc<CatalogClient>,
    /// Room → session index.
    pub registry: Arc<SessionRegistry>,
    /// Collaborators handed to every session driver.
    pub playback: PlaybackDeps,
    /// Task spawner for detached playback.
    pub spawner: TokioSpawner,
    /// Cancelled when shutdown begins.
    pub cancel_token: CancellationToken,
    /// Shared HTTP client for connection pooling.
    http_client: Client,
    config: Config,
}

impl BootstrappedServices {
    /// Returns the shared HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the start-quiz service on top of the platform's voice gateway.
    pub fn quiz_service(&self, voice: Arc<dyn VoiceGateway>) -> QuizService {
        QuizService::new(
            self.catalog.clone(),
            voice,
            self.playback.clone(),
            self.spawner.clone(),
            self.cancel_token.child_token(),
            &self.config,
        )
    }

    /// Stops every session and waits briefly for them to tear down.
    pub async fn shutdown(&self) {
        log::info!("[Bootstrap] Beginning graceful shutdown...");

        self.cancel_token.cancel();

        let stopped = self.registry.stop_all();
        log::info!("[Bootstrap] Stopped {} session(s)", stopped);

        let deadline = Instant::now() + Duration::from_secs(SHUTDOWN_GRACE_SECS);
        while !self.registry.is_empty() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if !self.registry.is_empty() {
            log::warn!(
                "[Bootstrap] {} session(s) still tearing down: {:?}",
                self.registry.len(),
                self.registry.rooms()
            );
        }

        log::info!("[Bootstrap] Shutdown complete");
    }
}

/// Creates the shared HTTP client used for catalog and preview requests.
fn create_http_client() -> QuizResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| QuizError::Internal(format!("failed to create HTTP client: {}", e)))
}

/// Bootstraps all services in dependency order:
///
/// 1. Shared infrastructure (HTTP client, cancellation token, spawner)
/// 2. Token cache (depends on HTTP client and credentials)
/// 3. Catalog client (depends on HTTP client and token cache)
/// 4. Session registry and playback collaborators
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns `QuizError::Configuration` if `config` does not validate.
pub fn bootstrap_services(
    config: &Config,
    events: Arc<dyn EventEmitter>,
) -> QuizResult<BootstrappedServices> {
    config.validate().map_err(QuizError::Configuration)?;

    let http_client = create_http_client()?;
    let cancel_token = CancellationToken::new();
    let spawner = TokioSpawner::current();

    let credentials = ClientCredentials::new(http_client.clone(), &config.catalog);
    let tokens = Arc::new(TokenCache::new(Arc::new(credentials)));
    let catalog = Arc::new(CatalogClient::new(
        http_client.clone(),
        tokens.clone(),
        &config.catalog,
    ));

    let registry = Arc::new(SessionRegistry::new());
    let playback = PlaybackDeps {
        factory: Arc::new(Mp3PipelineFactory),
        fetcher: Arc::new(HttpPreviewFetcher::new(http_client.clone())),
        registry: registry.clone(),
        events,
        policy: config.failure_policy,
    };

    log::info!(
        "[Bootstrap] Services ready (catalog {}, failure policy {:?})",
        config.catalog.api_url,
        config.failure_policy
    );

    Ok(BootstrappedServices {
        tokens,
        catalog,
        registry,
        playback,
        spawner,
        cancel_token,
        http_client,
        config: config.clone(),
    })
}
