//! Exponential-backoff retry for transient failures.
//!
//! [`retry_with_backoff`] runs an async operation and re-runs it while the
//! failure is classified as transient, sleeping `delay_for(attempt)` between
//! attempts. Anything the classifier rejects is returned on the spot.
//!
//! ```text
//! attempting --ok--------------------------> success
//! attempting --transient, retries left-----> retry-wait --> attempting
//! attempting --permanent or exhausted------> failed
//! ```

use std::fmt::Display;
use std::future::Future;
use std::io;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default upper bound on any single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Default growth factor between consecutive delays.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Lower-cased fragments that mark an error message as a transport failure.
pub const NETWORK_ERROR_SIGNATURES: &[&str] = &[
    "fetch failed",
    "failed to fetch",
    "network error",
    "networkerror",
    "network request failed",
    "timeout",
    "timed out",
    "connection refused",
    "connection reset",
    "connection closed",
    "connection aborted",
    "econnrefused",
    "econnreset",
    "etimedout",
    "epipe",
    "broken pipe",
    "socket hang up",
    "protocol error",
    "unexpected eof",
];

/// Tunable parameters for the backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait after the failed attempt numbered `attempt` (0-based):
    /// `min(base_delay * backoff_factor^attempt, max_delay)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_ms = self.base_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;
        let scaled = base_ms * self.backoff_factor.powi(exponent);
        let clamped = if scaled.is_nan() {
            max_ms
        } else {
            scaled.clamp(0.0, max_ms)
        };
        Duration::from_millis(clamped as u64)
    }
}

/// Run `op`, retrying transient failures under `policy`.
///
/// `is_retryable` decides whether a failure is worth another attempt. A
/// rejected failure is returned immediately without waiting; once
/// `policy.max_retries` retries have been spent, the last failure is
/// returned.
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    is_retryable: C,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) if attempt < policy.max_retries && is_retryable(&err) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying",
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if attempt > 0 {
                    tracing::warn!(retries = attempt, error = %err, "Giving up after retries");
                }
                return Err(err);
            }
        }
    }
}

/// Whether an error message carries one of the known transport signatures.
///
/// Type-mismatch errors are only transient when they talk about the network
/// transport (e.g. `TypeError: NetworkError when attempting to fetch`).
pub fn is_network_error_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    if NETWORK_ERROR_SIGNATURES.iter().any(|sig| lower.contains(sig)) {
        return true;
    }
    lower.contains("typeerror") && (lower.contains("network") || lower.contains("fetch"))
}

/// Whether an I/O error is the kind a fresh connection usually cures.
pub fn is_transient_io(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::TimedOut
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Interrupted
    ) || is_network_error_message(&err.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
