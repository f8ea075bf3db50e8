//! The multi-key text cache.

use crate::entry::TextEntry;
use mikra_ref::Section;
use std::collections::HashMap;
use tracing::debug;

/// Version pins and fetch mode that participate in a cache key. Two
/// requests for the same ref with different pins are different cache
/// entries; a context fetch (whole containing section) is keyed apart
/// from a plain segment fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    pub en_version: Option<String>,
    pub he_version: Option<String>,
    pub context: bool,
}

impl TextOptions {
    /// The same pins without the context flag — segment entries derived
    /// from a section payload are keyed this way.
    fn without_context(&self) -> TextOptions {
        TextOptions { context: false, ..self.clone() }
    }
}

/// Derive the cache key for a ref under the given options.
///
/// ```
/// use mikra_text::{TextOptions, cache_key};
/// let opts = TextOptions { en_version: Some("JPS".into()), he_version: None, context: true };
/// assert_eq!(cache_key("Genesis.1.4", &opts), "genesis.1.4&ven=JPS|CONTEXT");
/// ```
pub fn cache_key(ref_str: &str, opts: &TextOptions) -> String {
    let mut key = ref_str.to_lowercase();
    if let Some(version) = &opts.en_version {
        key.push_str("&ven=");
        key.push_str(version);
    }
    if let Some(version) = &opts.he_version {
        key.push_str("&vhe=");
        key.push_str(version);
    }
    if opts.context {
        key.push_str("|CONTEXT");
    }
    key
}

/// A stored slot: either a concrete payload, or a marker for a segment
/// whose text lives inside its parent section's payload.
#[derive(Debug, Clone)]
enum Slot {
    Full(TextEntry),
    Buildable(Buildable),
}

/// Everything needed to rebuild a segment entry from its cached parent.
/// Created only alongside the parent, in [`TextCache::store`].
#[derive(Debug, Clone)]
struct Buildable {
    ref_str: String,
    section_key: String,
    /// Zero-based position in the parent's top-level children.
    child_index: usize,
    sections: Vec<Section>,
    next: Option<String>,
    prev: Option<String>,
}

/// In-memory store of text payloads, keyed by [`cache_key`].
///
/// All refs passed in must already be canonical (the dotted form the ref
/// crate produces); the cache does no parsing of its own. Reads return
/// owned snapshots.
#[derive(Debug, Default)]
pub struct TextCache {
    entries: HashMap<String, Slot>,
    /// Lowercased ref → every key derived from it. Bookkeeping for
    /// diagnostics; invalidation is wholesale regardless.
    ref_keys: HashMap<String, Vec<String>>,
}

impl TextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched payload under the ref it was requested for.
    ///
    /// Beyond the primary entry this may write several more in the same
    /// operation:
    /// - a context fetch answers for the section's own ref too;
    /// - a section-level payload is decomposed into one buildable entry
    ///   per segment slot, so later segment reads need no network.
    ///
    /// Returns the constituent section refs of a spanning payload, which
    /// callers should warm in the background.
    pub fn store(&mut self, requested_ref: &str, entry: TextEntry, opts: &TextOptions) -> Vec<String> {
        let spanning = entry.spanning_refs.clone();
        if entry.ref_str != requested_ref || opts.context {
            // A context fetch comes back addressed to the whole section;
            // the payload answers for its own ref in plain form too.
            let own_ref = entry.ref_str.clone();
            self.insert(&own_ref, Slot::Full(entry.clone()), &opts.without_context());
        }
        if entry.is_section_level() && !entry.is_spanning {
            self.decompose(&entry, opts);
        }
        self.insert(requested_ref, Slot::Full(entry), opts);
        spanning
    }

    /// Read the entry for a ref. A buildable hit is resolved against its
    /// parent section transparently.
    pub fn get(&self, ref_str: &str, opts: &TextOptions) -> Option<TextEntry> {
        match self.entries.get(&cache_key(ref_str, opts))? {
            Slot::Full(entry) => Some(entry.clone()),
            Slot::Buildable(buildable) => self.build(buildable),
        }
    }

    pub fn contains(&self, ref_str: &str, opts: &TextOptions) -> bool {
        self.entries.contains_key(&cache_key(ref_str, opts))
    }

    /// Every cache key derived from a ref so far.
    pub fn keys_for_ref(&self, ref_str: &str) -> &[String] {
        self.ref_keys.get(&ref_str.to_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop everything, including the ref→key map. Writes don't carry
    /// enough provenance to invalidate derived entries one by one.
    pub fn invalidate_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.ref_keys.clear();
        debug!(dropped, "text cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, ref_str: &str, slot: Slot, opts: &TextOptions) {
        let key = cache_key(ref_str, opts);
        self.ref_keys.entry(ref_str.to_lowercase()).or_default().push(key.clone());
        self.entries.insert(key, slot);
    }

    /// Split a section payload into per-segment buildable markers.
    ///
    /// Segment numbering starts at the payload's own leaf offset for a
    /// ranged payload ("Genesis 1:4-6" holds segments 4..=6) and at 1 for
    /// a whole-section payload. Sibling links skip segments with no
    /// content in either language; the chain's open ends point at the
    /// parent's own neighbors.
    fn decompose(&mut self, entry: &TextEntry, opts: &TextOptions) {
        let slots = entry.segment_slots();
        if slots == 0 {
            return;
        }
        let start = if entry.ref_str == entry.section_ref {
            1
        } else {
            entry.sections.last().map(|s| s.ordinal()).unwrap_or(1)
        };
        // Segments rebuild from wherever the payload itself is stored: the
        // section's own key for section/context payloads, the ranged ref's
        // key for a ranged payload (which holds only its own slice).
        let section_key = cache_key(&entry.ref_str, &opts.without_context());
        let child_ref = |i: usize| format!("{}.{}", entry.section_ref, start + i as u32);
        let segment_opts = opts.without_context();

        for i in 0..slots {
            let next = (i + 1..slots).find(|&j| entry.segment_has_content(j)).map(child_ref).or_else(|| entry.next.clone());
            let prev = (0..i).rev().find(|&j| entry.segment_has_content(j)).map(child_ref).or_else(|| entry.prev.clone());
            let mut sections = entry.sections.clone();
            if entry.ref_str == entry.section_ref {
                sections.push(Section::Num(start + i as u32));
            } else if let Some(last) = sections.last_mut() {
                *last = Section::Num(start + i as u32);
            }
            let buildable = Buildable {
                ref_str: child_ref(i),
                section_key: section_key.clone(),
                child_index: i,
                sections,
                next,
                prev,
            };
            self.insert(&child_ref(i), Slot::Buildable(buildable), &segment_opts);
        }
    }

    /// Materialize a segment entry from its parent's payload. The parent
    /// is written in the same operation as the marker, so a dangling
    /// marker is a bug, not an expected state.
    fn build(&self, buildable: &Buildable) -> Option<TextEntry> {
        let Some(Slot::Full(parent)) = self.entries.get(&buildable.section_key) else {
            debug!(ref_str = %buildable.ref_str, "buildable entry without a cached parent");
            return None;
        };
        let segment_number = buildable.sections.last().map(|s| s.ordinal()).unwrap_or(0);
        let he_ref = parent.he_ref.as_ref().and_then(|he_section| {
            let numeral = mikra_hebrew::encode_hebrew_numeral(segment_number)?;
            Some(format!("{he_section}:{numeral}"))
        });
        Some(TextEntry {
            ref_str: buildable.ref_str.clone(),
            he_ref,
            section_ref: parent.section_ref.clone(),
            book: parent.book.clone(),
            sections: buildable.sections.clone(),
            to_sections: buildable.sections.clone(),
            text: parent.text.child_or_empty(buildable.child_index),
            he: parent.he.child_or_empty(buildable.child_index),
            en_version: parent.en_version.clone(),
            he_version: parent.he_version.clone(),
            next: buildable.next.clone(),
            prev: buildable.prev.clone(),
            is_spanning: false,
            spanning_refs: Vec::new(),
        })
    }
}
