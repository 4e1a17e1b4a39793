use std::num::NonZeroU32;
use std::time::Duration;

/// HTTP status the index answers with when it is temporarily overloaded.
pub const TRANSIENT_STATUS: u16 = 500;

/// How the delay between retries evolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Always wait the base retry delay.
    Fixed,
    /// Multiply the delay after every retry, up to `max`.
    Exponential { multiplier: f64, max: Duration },
}

/// Pacing and retry behaviour of a [`Fetcher`](crate::Fetcher).
///
/// The default policy retries transient errors forever, assuming the index
/// always comes back eventually.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Pause after every attempt, successful or not.
    pub request_delay: Duration,
    /// Base pause before retrying a transient error.
    pub retry_delay: Duration,
    /// Total attempts per request; `None` retries without limit.
    pub max_attempts: Option<NonZeroU32>,
    pub backoff: Backoff,
    /// Status treated as transient.
    pub transient_status: u16,
}
impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(3))
    }
}
impl RetryPolicy {
    pub fn new(request_delay: Duration, retry_delay: Duration) -> Self {
        Self {
            request_delay,
            retry_delay,
            max_attempts: None,
            backoff: Backoff::Fixed,
            transient_status: TRANSIENT_STATUS,
        }
    }

    /// No pacing, no waiting between retries. Meant for tests.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<NonZeroU32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn is_transient(&self, status: u16) -> bool {
        status == self.transient_status
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max.get())
    }

    /// Delay before retry number `retry` (starting at 1).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.retry_delay,
            Backoff::Exponential { multiplier, max } => {
                let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
                let secs = (self.retry_delay.as_secs_f64() * multiplier.powi(exponent)).max(0.0);
                if secs.is_finite() && secs < max.as_secs_f64() {
                    Duration::from_secs_f64(secs)
                } else {
                    max
                }
            },
        }
    }
}
