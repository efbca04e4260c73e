//! Retry logic for the token endpoint.
//!
//! Unlike metadata requests, which fail on the first error, token refresh is
//! retried a fixed number of times with a fixed delay between attempts.

use std::future::Future;
use std::time::Duration;

use super::{CatalogError, CatalogResult};

/// Runs `operation` up to `attempts` times, sleeping `delay` between attempts.
///
/// Every error counts as a failed attempt. The last error is returned once
/// all attempts are exhausted.
///
/// # Arguments
/// * `action` - Action name for logging
/// * `attempts` - Total number of attempts (values below 1 are treated as 1)
/// * `delay` - Pause between two consecutive attempts
/// * `operation` - Closure that performs one attempt
pub(crate) async fn with_fixed_retry<T, F, Fut>(
    action: &str,
    attempts: usize,
    delay: Duration,
    mut operation: F,
) -> CatalogResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    let attempts = attempts.max(1);
    let mut last_error: Option<CatalogError> = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            log::info!(
                "[Catalog] Retrying {} (attempt {}/{}) after {:?}",
                action,
                attempt,
                attempts,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("[Catalog] {} failed: {}", action, e);
                last_error = Some(e);
            }
        }
    }

    // attempts >= 1, so the loop ran and either returned or recorded an error
    Err(last_error.unwrap_or(CatalogError::Status(0)))
}
