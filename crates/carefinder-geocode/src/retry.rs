//! Retry with exponential back-off and jitter for geocoding requests.
//!
//! Only the geocode call is retried. Suggestions fail soft and are never
//! retried, since a newer keystroke will supersede them anyway.

use std::future::Future;
use std::time::Duration;

use crate::client::NominatimOptions;
use crate::error::GeocodeError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and HTTP 5xx.
///
/// **Not retriable:** 4xx responses, malformed bodies, and "no match" answers.
pub(crate) fn is_retriable(err: &GeocodeError) -> bool {
    match err {
        GeocodeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeocodeError::RateLimited { .. } => true,
        GeocodeError::UnexpectedStatus { status, .. } => *status >= 500,
        GeocodeError::Deserialize { .. }
        | GeocodeError::NoMatch { .. }
        | GeocodeError::InvalidBaseUrl { .. } => false,
    }
}

/// Upper bound on the nominal wait between two geocode attempts.
const MAX_DELAY: Duration = Duration::from_secs(10);

/// How [`NominatimClient`](crate::NominatimClient) retries the geocode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GeocodeRetry {
    pub(crate) max_retries: u32,
    pub(crate) base_delay: Duration,
}

impl GeocodeRetry {
    pub(crate) fn from_options(options: &NominatimOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            base_delay: Duration::from_millis(options.backoff_base_ms),
        }
    }

    /// Wait before retry number `retry` (1-based) without jitter: the base
    /// delay doubled for every earlier retry, capped at [`MAX_DELAY`].
    pub(crate) fn nominal_delay(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(10);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }

    /// [`GeocodeRetry::nominal_delay`] spread by ±25 %.
    fn jittered_delay(&self, retry: u32) -> Duration {
        self.nominal_delay(retry).mul_f64(rand::random_range(0.75..1.25))
    }

    /// Looks `address` up with `lookup`, retrying transient failures up to
    /// `max_retries` times. Anything [`is_retriable`] rejects is returned
    /// straight away.
    pub(crate) async fn run<T, F, Fut>(
        &self,
        address: &str,
        mut lookup: F,
    ) -> Result<T, GeocodeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeocodeError>>,
    {
        let mut outcome = lookup().await;
        for retry in 1..=self.max_retries {
            let err = match outcome {
                Err(err) if is_retriable(&err) => err,
                done => return done,
            };
            let delay = self.jittered_delay(retry);
            tracing::warn!(
                address,
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "geocode lookup failed, backing off"
            );
            tokio::time::sleep(delay).await;
            outcome = lookup().await;
        }
        outcome
    }
}
