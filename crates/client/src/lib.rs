//! Async API gateway for the library platform.
//!
//! [`ApiClient`] fronts the reference parser, the text cache and the link
//! aggregator with a promise-per-URL network layer: concurrent callers of
//! the same URL share one in-flight request, resolved values are cached at
//! whatever granularity the endpoint calls for, and authenticated writes
//! invalidate wholesale.
//!
//! There is no retry, timeout or cancellation layer here — a failed fetch
//! rejects and the caller decides what to do about it. The transport is a
//! trait, so everything above it is exercised in tests against an
//! in-memory mock.

mod client;
mod config;
pub mod error;
mod history;
mod name;
mod transport;
mod urls;

pub use crate::client::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::history::{HistoryItem, ReadingHistory, USER_HISTORY_KEY};
pub use crate::name::NameResponse;
#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;
#[cfg(any(test, feature = "mock"))]
pub use crate::transport::MockTransport;
pub use crate::transport::{Transport, TransportHandle};
// The option/value types callers hand to and get back from the client.
pub use mikra_links::{LinkItem, LinkSummaryEntry, RelatedBundle};
pub use mikra_ref::{RefParseError, StructuredRef, TitleIndex};
pub use mikra_text::{TextEntry, TextNode, TextOptions, VersionMeta};
