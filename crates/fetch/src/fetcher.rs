use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::{RetryPolicy, TransportHandle};

/// Paced, retrying HTTP GET.
///
/// Requests are strictly sequential: each one completes, including its pacing
/// pause, before the caller can issue the next.
#[derive(Clone)]
pub struct Fetcher {
    transport: TransportHandle,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: TransportHandle, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches the body of `url`.
    ///
    /// Every attempt is followed by the policy's request delay. A transient
    /// server error is retried after the policy's retry delay, for as long as
    /// the policy allows (forever by default).
    ///
    /// # Errors
    ///
    /// - [`Status`](ErrorKind::Status) for any other non-success status,
    /// - [`RetriesExhausted`](ErrorKind::RetriesExhausted) when a bounded
    ///   policy gives up,
    /// - [`Network`](ErrorKind::Network) when no response was received.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let response = self.transport.get(url).await;
            Self::pause(self.policy.request_delay).await;
            let response = response?;
            if response.is_success() {
                tracing::debug!(attempts, bytes = response.body.len(), "Fetched");
                return Ok(response.body);
            }
            if !self.policy.is_transient(response.status) {
                exn::bail!(ErrorKind::Status {
                    status: response.status,
                    url: url.to_string(),
                    body: response.body,
                });
            }
            if !self.policy.allows_retry(attempts) {
                exn::bail!(ErrorKind::RetriesExhausted {
                    url: url.to_string(),
                    attempts,
                });
            }
            let delay = self.policy.delay_for(attempts);
            tracing::warn!(
                status = response.status,
                attempt = attempts,
                delay_ms = delay.as_millis(),
                "Transient server error, retrying"
            );
            Self::pause(delay).await;
        }
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
