//! Scripted transport for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{ErrorKind, Result};
use crate::{Response, Transport};

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<Response>>,
    unreachable: Vec<String>,
    requests: Vec<String>,
}

/// In-memory transport that replays scripted responses per URL.
///
/// Each URL has a queue of responses; every request pops the front of the
/// queue, except the last response which is replayed forever. Unscripted URLs
/// answer `404`. Every requested URL is recorded, in order.
///
/// # Examples
///
/// ```ignore
/// use pkgdl_fetch::{MockTransport, Response, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::with_pages([("https://index.example/noble/curl", "<html>curl</html>")]);
/// transport.push("https://index.example/noble/wget", Response::new(500, "busy"));
/// transport.push("https://index.example/noble/wget", Response::ok("<html>wget</html>"));
/// assert_eq!(transport.get("https://index.example/noble/wget").await.unwrap().status, 500);
/// assert_eq!(transport.get("https://index.example/noble/wget").await.unwrap().status, 200);
/// assert_eq!(transport.request_count("https://index.example/noble/wget"), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<Script>,
}

impl MockTransport {
    /// Transport answering `200` with the given body for each URL.
    pub fn with_pages(pages: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let mut script = Script::default();
        for (url, body) in pages {
            script.responses.entry(url.into()).or_default().push_back(Response::ok(body));
        }
        Self {
            script: Mutex::new(script),
        }
    }

    /// Appends a response to the URL's queue.
    pub fn push(&self, url: impl Into<String>, response: Response) {
        self.script().responses.entry(url.into()).or_default().push_back(response);
    }

    /// Makes requests to the URL fail without a response.
    pub fn fail(&self, url: impl Into<String>) {
        self.script().unreachable.push(url.into());
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.script().requests.clone()
    }

    /// Number of requests made for one URL.
    pub fn request_count(&self, url: &str) -> usize {
        self.script().requests.iter().filter(|requested| *requested == url).count()
    }

    // A panicking test poisons the lock; the script itself is still usable.
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        let mut script = self.script();
        script.requests.push(url.to_string());
        if script.unreachable.iter().any(|unreachable| unreachable == url) {
            exn::bail!(ErrorKind::Network(url.to_string()));
        }
        let response = match script.responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| Response::new(404, "not found")))
    }
}
