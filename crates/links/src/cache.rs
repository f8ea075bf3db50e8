//! Per-segment bucketing of related content.

use crate::models::{Anchored, RelatedBundle};
use mikra_ref::RefParser;
use std::collections::HashMap;
use tracing::warn;

/// Cache of related-content buckets.
///
/// Two layers: the unsplit bundle exactly as fetched for a requested ref,
/// and per-segment buckets produced by splitting bundles on their items'
/// anchors. The unsplit entry is always replaced by a newer fetch; the
/// per-segment buckets only grow — a list is overwritten only by one at
/// least as long, so a narrow fetch can never erase results a wider fetch
/// already contributed.
#[derive(Debug, Default)]
pub struct LinkCache {
    whole: HashMap<String, RelatedBundle>,
    by_segment: HashMap<String, RelatedBundle>,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched bundle for `requested_ref`, splitting it into
    /// per-segment buckets. Anchor refs are resolved through `parser`;
    /// items whose anchors resolve to nothing are dropped with a warning.
    pub fn merge(&mut self, requested_ref: &str, bundle: RelatedBundle, parser: &RefParser) {
        let mut segments: HashMap<String, RelatedBundle> = HashMap::new();

        for link in &bundle.links {
            for anchor in resolve_anchors(link, parser, "link") {
                segments.entry(anchor).or_default().links.push(link.clone());
            }
        }
        for note in &bundle.notes {
            for anchor in resolve_anchors(note, parser, "note") {
                segments.entry(anchor).or_default().notes.push(note.clone());
            }
        }
        for sheet in &bundle.sheets {
            for anchor in resolve_anchors(sheet, parser, "sheet") {
                segments.entry(anchor).or_default().sheets.push(sheet.clone());
            }
        }

        for (segment_ref, fresh) in segments {
            let bucket = self.by_segment.entry(segment_ref).or_default();
            monotonic_replace(bucket, fresh);
        }
        self.whole.insert(key(requested_ref), bundle);
    }

    /// The unsplit bundle fetched for exactly this ref, if any.
    pub fn whole(&self, ref_str: &str) -> Option<RelatedBundle> {
        self.whole.get(&key(ref_str)).cloned()
    }

    /// The per-segment bucket for a ref. Falls back to the unsplit entry
    /// when the ref was itself a requested ref.
    pub fn bucket(&self, ref_str: &str) -> Option<RelatedBundle> {
        self.by_segment.get(&key(ref_str)).cloned().or_else(|| self.whole(ref_str))
    }

    pub fn invalidate_all(&mut self) {
        self.whole.clear();
        self.by_segment.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.whole.is_empty() && self.by_segment.is_empty()
    }
}

fn key(ref_str: &str) -> String {
    ref_str.to_lowercase()
}

/// Replace each typed list only when the replacement is at least as long.
fn monotonic_replace(bucket: &mut RelatedBundle, fresh: RelatedBundle) {
    if fresh.links.len() >= bucket.links.len() {
        bucket.links = fresh.links;
    }
    if fresh.notes.len() >= bucket.notes.len() {
        bucket.notes = fresh.notes;
    }
    if fresh.sheets.len() >= bucket.sheets.len() {
        bucket.sheets = fresh.sheets;
    }
}

/// Resolve an item's anchor to canonical segment refs.
///
/// Server-expanded anchors win; otherwise the primary anchor is parsed
/// and, when ranged, split into its constituents. An item that resolves
/// to nothing is reported and skipped — aggregation is best-effort.
fn resolve_anchors<T: Anchored>(item: &T, parser: &RefParser, kind: &str) -> Vec<String> {
    let expanded = item.expanded_anchors();
    let resolved: Vec<String> = if expanded.is_empty() {
        let primary = item.primary_anchor();
        if primary.is_empty() {
            Vec::new()
        } else {
            parser
                .parse(primary)
                .map(|sref| sref.split_ranging().into_iter().map(|seg| seg.ref_str).collect())
                .unwrap_or_default()
        }
    } else {
        expanded.iter().filter_map(|anchor| parser.parse(anchor).ok().map(|sref| sref.ref_str)).collect()
    };
    if resolved.is_empty() {
        warn!(kind, anchor = item.primary_anchor(), "dropping item with unresolvable anchor");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkItem, NoteItem, SheetItem};
    use mikra_ref::fixtures;
    use std::sync::Arc;

    fn parser() -> RefParser {
        RefParser::new(Arc::new(fixtures::sample_index()))
    }

    fn link(anchor: &str, expanded: &[&str]) -> LinkItem {
        LinkItem {
            anchor_ref: anchor.into(),
            anchor_ref_expanded: expanded.iter().map(|s| s.to_string()).collect(),
            category: "Commentary".into(),
            ..LinkItem::default()
        }
    }

    fn bundle_of(links: Vec<LinkItem>) -> RelatedBundle {
        RelatedBundle { links, ..RelatedBundle::default() }
    }

    #[test]
    fn ranged_anchors_attribute_to_every_constituent() {
        let parser = parser();
        let mut cache = LinkCache::new();
        cache.merge("Genesis.1", bundle_of(vec![link("Genesis 1:4-5", &["Genesis 1:4", "Genesis 1:5"])]), &parser);

        assert_eq!(cache.bucket("Genesis.1.4").unwrap().links.len(), 1);
        assert_eq!(cache.bucket("Genesis.1.5").unwrap().links.len(), 1);
        assert!(cache.bucket("Genesis.1.6").is_none());
    }

    #[test]
    fn unexpanded_ranges_are_split_locally() {
        let parser = parser();
        let mut cache = LinkCache::new();
        cache.merge("Genesis.1", bundle_of(vec![link("Genesis 1:4-6", &[])]), &parser);

        for segment in ["Genesis.1.4", "Genesis.1.5", "Genesis.1.6"] {
            assert_eq!(cache.bucket(segment).unwrap().links.len(), 1, "{segment}");
        }
    }

    #[test]
    fn unresolvable_anchors_are_dropped_not_fatal() {
        let parser = parser();
        let mut cache = LinkCache::new();
        let links =
            vec![link("Atlantis 3:12", &[]), link("", &[]), link("Genesis 1:4", &[])];
        cache.merge("Genesis.1", bundle_of(links), &parser);

        assert_eq!(cache.bucket("Genesis.1.4").unwrap().links.len(), 1);
        // The unsplit entry still carries everything the server sent.
        assert_eq!(cache.whole("Genesis.1").unwrap().links.len(), 3);
    }

    #[test]
    fn buckets_never_shrink() {
        let parser = parser();
        let mut cache = LinkCache::new();
        let five: Vec<LinkItem> = (0..5).map(|_| link("Genesis 1:4", &[])).collect();
        cache.merge("Genesis.1", bundle_of(five), &parser);
        assert_eq!(cache.bucket("Genesis.1.4").unwrap().links.len(), 5);

        // A narrower fetch with fewer results must not regress the bucket.
        let three: Vec<LinkItem> = (0..3).map(|_| link("Genesis 1:4", &[])).collect();
        cache.merge("Genesis.1.4", bundle_of(three), &parser);
        assert_eq!(cache.bucket("Genesis.1.4").unwrap().links.len(), 5);

        // A bigger result set replaces it.
        let seven: Vec<LinkItem> = (0..7).map(|_| link("Genesis 1:4", &[])).collect();
        cache.merge("Genesis.1.4", bundle_of(seven), &parser);
        assert_eq!(cache.bucket("Genesis.1.4").unwrap().links.len(), 7);
    }

    #[test]
    fn whole_entry_is_always_replaced() {
        let parser = parser();
        let mut cache = LinkCache::new();
        let five: Vec<LinkItem> = (0..5).map(|_| link("Genesis 1:4", &[])).collect();
        cache.merge("Genesis.1.4", bundle_of(five), &parser);
        let three: Vec<LinkItem> = (0..3).map(|_| link("Genesis 1:4", &[])).collect();
        cache.merge("Genesis.1.4", bundle_of(three), &parser);

        assert_eq!(cache.whole("Genesis.1.4").unwrap().links.len(), 3);
    }

    #[test]
    fn notes_and_sheets_bucket_too() {
        let parser = parser();
        let mut cache = LinkCache::new();
        let bundle = RelatedBundle {
            notes: vec![NoteItem { ref_str: "Genesis 1:4".into(), text: "note".into(), ..NoteItem::default() }],
            sheets: vec![SheetItem { id: 7, anchor_ref: "Genesis 1:4".into(), ..SheetItem::default() }],
            ..RelatedBundle::default()
        };
        cache.merge("Genesis.1", bundle, &parser);

        let bucket = cache.bucket("Genesis.1.4").unwrap();
        assert_eq!(bucket.notes.len(), 1);
        assert_eq!(bucket.sheets.len(), 1);
    }

    #[test]
    fn invalidation_clears_both_layers() {
        let parser = parser();
        let mut cache = LinkCache::new();
        cache.merge("Genesis.1", bundle_of(vec![link("Genesis 1:4", &[])]), &parser);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
