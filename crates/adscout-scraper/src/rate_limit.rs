//! Request pacing and retry for the ad-library client.
//!
//! Every outbound request is preceded by a randomized pause so that
//! consecutive searches do not arrive at a fixed cadence. Transient failures
//! (HTTP 429, 5xx, network errors) are retried with exponential back-off and
//! ±25 % jitter; everything else is returned immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// Upper bound on any single back-off sleep.
const MAX_BACKOFF_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a back-off delay.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::InvalidSearchUrl { .. }
        | ScraperError::Deadline { .. }
        | ScraperError::Fixture { .. }
        | ScraperError::Cancelled => false,
    }
}

/// Sleeps for a uniformly random duration in `[min_ms, max_ms]`.
///
/// A zero-width or inverted range sleeps for `min_ms`.
pub(crate) async fn polite_delay(min_ms: u64, max_ms: u64) {
    let delay_ms = if max_ms > min_ms {
        rand::rng().random_range(min_ms..=max_ms)
    } else {
        min_ms
    };
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Executes `operation` with exponential back-off retries on transient errors.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// jittered by ±25 % and capped at 60 s. With `max_retries = 3` the operation
/// runs at most 4 times. If all retries are exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_BACKOFF_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient ad-library error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
