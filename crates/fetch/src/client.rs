//! Transport backed by a shared [`reqwest::Client`].

use async_trait::async_trait;
use exn::ResultExt;
use std::time::Duration;

use crate::error::{ErrorKind, Result};
use crate::{Response, Transport};

const USER_AGENT: &str = concat!("pkgdl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}
impl ReqwestTransport {
    /// Builds a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        tracing::trace!(url, status, bytes = body.len(), "Received response");
        Ok(Response::new(status, body.to_vec()))
    }
}
