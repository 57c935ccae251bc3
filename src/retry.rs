//! Retry loop with exponential backoff for provider calls.
//!
//! The loop has no attempt cap. It stops on success, on a structured provider
//! rejection, or when the call's deadline or cancellation fires.

use log::{debug, info, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::domain::model::{CallContext, Interrupt};
use crate::provider::ProviderFailure;
use crate::provider::api::ApiError;

/// Exponential backoff with randomized delays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    /// Each delay is drawn from `interval * (1 ± randomization_factor)`.
    pub randomization_factor: f64,
    pub max_interval: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_interval: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Starts a fresh delay sequence for one call.
    ///
    /// Out-of-range settings are clamped: the multiplier to at least 1, the
    /// randomization factor to `0..=1`, and the first interval to
    /// `max_interval`.
    pub fn start(&self) -> Backoff {
        let multiplier = if self.multiplier.is_finite() {
            self.multiplier.max(1.0)
        } else {
            1.0
        };
        let randomization_factor = if self.randomization_factor.is_finite() {
            self.randomization_factor.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Backoff {
            policy: BackoffPolicy {
                multiplier,
                randomization_factor,
                ..*self
            },
            current: self.initial_interval.min(self.max_interval),
        }
    }
}

/// Delay sequence of a single call.
#[derive(Debug)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    /// Returns the next randomized delay and grows the base interval.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current.as_secs_f64();
        let spread = base * self.policy.randomization_factor;
        let delay = if spread > 0.0 {
            rand::thread_rng().gen_range((base - spread)..=(base + spread))
        } else {
            base
        };

        let max = self.policy.max_interval.as_secs_f64();
        self.current = Duration::from_secs_f64((base * self.policy.multiplier).min(max));

        Duration::from_secs_f64(delay.max(0.0))
    }
}

/// Terminal result of the retry loop.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The provider accepted the call.
    Completed(T),
    /// The provider rejected the call with a structured error.
    Rejected(ApiError),
}

/// The loop was stopped by the call context before a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted {
    pub reason: Interrupt,
    pub attempts: u32,
}

/// Runs `attempt` until it succeeds or is rejected, sleeping between
/// transport failures. Deadline and cancellation are checked before each
/// attempt and during each sleep, never while an attempt is in flight.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &BackoffPolicy,
    ctx: &CallContext,
    operation_name: &str,
    mut attempt: F,
) -> Result<Outcome<T>, Interrupted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderFailure>>,
{
    let mut backoff = policy.start();
    let mut attempts: u32 = 0;

    loop {
        if let Some(reason) = ctx.interrupted() {
            return Err(Interrupted { reason, attempts });
        }

        attempts += 1;
        match attempt().await {
            Ok(value) => {
                if attempts > 1 {
                    info!("{}: succeeded after {} attempts", operation_name, attempts);
                }
                return Ok(Outcome::Completed(value));
            }
            Err(ProviderFailure::Api(error)) => {
                debug!("{}: provider rejected the request: {}", operation_name, error);
                return Ok(Outcome::Rejected(error));
            }
            Err(ProviderFailure::Transport(e)) => {
                let delay = backoff.next_delay();
                warn!(
                    "{}: attempt {} failed ({:#}), retrying in {}ms...",
                    operation_name,
                    attempts,
                    e,
                    delay.as_millis()
                );
                if let Some(reason) = ctx.sleep(delay).await {
                    return Err(Interrupted { reason, attempts });
                }
            }
        }
    }
}
