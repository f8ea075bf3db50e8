//! The network seam.
//!
//! Everything above this trait is testable without a network: the real
//! client speaks HTTP via [`HttpTransport`], tests swap in the in-memory
//! [`MockTransport`] and count what would have gone over the wire.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to a transport implementation.
pub type TransportHandle = Arc<dyn Transport>;

/// JSON-in/JSON-out access to the API origin.
///
/// Implementations must not cache and must not retry — both policies
/// belong to the layers above (the client caches, callers decide about
/// retries).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
    async fn delete_json(&self, url: &str) -> Result<Value>;
}

#[cfg(feature = "http")]
mod http {
    use super::*;
    use crate::error::ErrorKind;
    use exn::ResultExt;

    /// [`Transport`] over HTTP via `reqwest`.
    #[derive(Debug, Clone, Default)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new() -> Self {
            Self::default()
        }

        async fn into_json(response: reqwest::Response) -> Result<Value> {
            let status = response.status();
            if !status.is_success() {
                exn::bail!(ErrorKind::Status(status.as_u16()));
            }
            response.json().await.or_raise(|| ErrorKind::Decode)
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn get_json(&self, url: &str) -> Result<Value> {
            let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Http)?;
            Self::into_json(response).await
        }

        async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
            let response = self.client.post(url).json(body).send().await.or_raise(|| ErrorKind::Http)?;
            Self::into_json(response).await
        }

        async fn delete_json(&self, url: &str) -> Result<Value> {
            let response = self.client.delete(url).send().await.or_raise(|| ErrorKind::Http)?;
            Self::into_json(response).await
        }
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpTransport;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory transport for testing.
    ///
    /// Serves canned responses by exact URL and logs every request it
    /// receives, so tests can assert on how many actually "hit the
    /// network". An optional artificial latency keeps requests in flight
    /// long enough for de-duplication windows to be observable.
    pub struct MockTransport {
        responses: HashMap<String, Value>,
        requests: Mutex<Vec<String>>,
        latency: Option<Duration>,
    }

    impl MockTransport {
        /// Canned responses keyed by full URL.
        pub fn with_responses(responses: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
            Self {
                responses: responses.into_iter().map(|(url, value)| (url.into(), value)).collect(),
                requests: Mutex::new(Vec::new()),
                latency: None,
            }
        }

        /// Hold every request open for `latency` before answering.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Every URL requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        /// How many times `url` was requested.
        pub fn hits(&self, url: &str) -> usize {
            self.requests.lock().unwrap().iter().filter(|requested| *requested == url).count()
        }

        async fn answer(&self, url: &str) -> Result<Value> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            match self.responses.get(url) {
                Some(value) => Ok(value.clone()),
                None => exn::bail!(ErrorKind::Status(404)),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get_json(&self, url: &str) -> Result<Value> {
            self.answer(url).await
        }

        async fn post_json(&self, url: &str, _body: &Value) -> Result<Value> {
            self.answer(url).await
        }

        async fn delete_json(&self, url: &str) -> Result<Value> {
            self.answer(url).await
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockTransport;
