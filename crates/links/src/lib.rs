//! Link/note/sheet aggregation.
//!
//! The related-content endpoint answers for a whole ref at once: every
//! commentary link, user note and source sheet anchored anywhere inside
//! it. Readers want those re-bucketed per segment, so this crate splits a
//! bundle by resolved anchor refs and keeps the per-segment buckets in a
//! cache with a deliberately one-directional merge: a narrower fetch must
//! never shrink a bucket an earlier, wider fetch filled.
//!
//! Aggregation is best-effort. An item whose anchor can't be resolved to
//! any concrete ref is dropped with a warning rather than failing the
//! whole bundle.

mod cache;
mod filter;
mod models;
mod summary;

pub use crate::cache::LinkCache;
pub use crate::filter::{filter_links, link_count};
pub use crate::models::{Anchored, LinkItem, NoteItem, RelatedBundle, SheetItem, TitleByLang};
pub use crate::summary::{BookCount, LinkSummaryEntry, link_summary};
