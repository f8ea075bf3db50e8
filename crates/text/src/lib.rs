//! In-memory text/version cache with lazy segment decomposition.
//!
//! Text payloads arrive from the API at section granularity ("Genesis 1"
//! with all of its verses) but readers address segments ("Genesis 1:4").
//! Rather than storing every segment's text twice, the cache stores the
//! section payload once and a *buildable* marker per segment; reading a
//! buildable entry slices the segment out of its parent on the fly.
//! Buildable markers are only ever created in the same operation that
//! stores their concrete parent, so a marker can always be resolved.
//!
//! The cache is not the source of truth — the server is. Any authenticated
//! write invalidates the whole cache rather than trying to track which
//! derived entries a change reaches.

pub mod error;
mod cache;
mod entry;
mod node;
mod prefs;
mod version;

pub use crate::cache::{TextCache, TextOptions, cache_key};
pub use crate::entry::{TextEntry, TextResponse};
pub use crate::node::TextNode;
pub use crate::prefs::{JsonFileStore, MemoryStore, PreferenceStore, VERSION_PREFS_KEY, VersionPreferences};
pub use crate::version::VersionMeta;
