//! HTTP fetch layer.
//!
//! [`Fetcher`] performs GET requests through a [`Transport`], pausing after
//! every attempt to stay under the remote's rate limits and retrying transient
//! server errors according to a [`RetryPolicy`]. Any other failure status is
//! surfaced immediately, together with the response body.

pub mod error;
mod fetcher;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod policy;
#[cfg(feature = "reqwest")]
mod client;
mod transport;

pub use crate::fetcher::Fetcher;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockTransport;
pub use crate::policy::{Backoff, RetryPolicy};
#[cfg(feature = "reqwest")]
pub use crate::client::ReqwestTransport;
pub use crate::transport::{Response, Transport};
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
