//! Fixed-delay retry policy and the sleep seam used between attempts

use std::future::Future;
use std::time::Duration;

/// Default number of connection attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between attempts
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Retry policy configuration
///
/// The delay is constant: there is no backoff growth and no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, always at least 1
    pub max_attempts: u32,

    /// Pause between consecutive attempts
    pub delay: Duration,

    /// Also pause after the final failed attempt before giving up
    pub sleep_after_final_attempt: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            sleep_after_final_attempt: false,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default settings (5 attempts, 2 seconds apart)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum number of attempts; zero is raised to one
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Set the pause between attempts
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keep the pause after the last failed attempt
    #[must_use]
    pub const fn with_sleep_after_final_attempt(mut self, enabled: bool) -> Self {
        self.sleep_after_final_attempt = enabled;
        self
    }

    /// Number of attempts the loop will make
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether a pause follows the failure of the 0-based attempt `index`
    #[must_use]
    pub fn sleeps_after(&self, index: u32) -> bool {
        index + 1 < self.attempts() || self.sleep_after_final_attempt
    }
}

/// Suspends the retry loop between attempts
///
/// Production code uses [`TokioSleeper`]; tests substitute an implementation
/// that records the requested durations instead of waiting.
pub trait Sleeper {
    /// Wait for `duration`
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
