//! Text payloads: the wire response and the cached entry built from it.

use crate::node::TextNode;
use crate::version::VersionMeta;
use mikra_ref::Section;
use serde::{Deserialize, Serialize};

/// The texts endpoint payload, as it arrives. Version metadata comes
/// flattened into the top level (one set of fields per language); the
/// entry conversion folds it into [`VersionMeta`] records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResponse {
    #[serde(rename = "ref")]
    pub ref_str: String,
    #[serde(default)]
    pub he_ref: Option<String>,
    /// The containing section's ref; equals `ref` for section fetches.
    #[serde(default)]
    pub section_ref: Option<String>,
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub to_sections: Vec<Section>,
    #[serde(default)]
    pub text: TextNode,
    #[serde(default)]
    pub he: TextNode,
    #[serde(default)]
    pub version_title: Option<String>,
    #[serde(default)]
    pub version_title_in_hebrew: Option<String>,
    #[serde(default)]
    pub version_source: Option<String>,
    #[serde(default)]
    pub version_notes: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub he_version_title: Option<String>,
    #[serde(default)]
    pub he_version_title_in_hebrew: Option<String>,
    #[serde(default)]
    pub he_version_source: Option<String>,
    #[serde(default)]
    pub he_version_notes: Option<String>,
    #[serde(default)]
    pub he_license: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub is_spanning: bool,
    #[serde(default)]
    pub spanning_refs: Vec<String>,
}

/// A cached text payload. Reads hand out owned clones of these — cache
/// internals are never exposed by reference, so callers can't mutate a
/// stored entry behind the cache's back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEntry {
    /// Canonical ref this entry answers for.
    pub ref_str: String,
    pub he_ref: Option<String>,
    /// Canonical ref of the containing section.
    pub section_ref: String,
    pub book: String,
    pub sections: Vec<Section>,
    pub to_sections: Vec<Section>,
    pub text: TextNode,
    pub he: TextNode,
    pub en_version: Option<VersionMeta>,
    pub he_version: Option<VersionMeta>,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub is_spanning: bool,
    pub spanning_refs: Vec<String>,
}

impl TextEntry {
    /// Fold a wire response into an entry, normalizing the flattened
    /// per-language version fields into [`VersionMeta`] records. Refs are
    /// carried as-is; callers canonicalize them before storing.
    pub fn from_response(resp: TextResponse) -> Self {
        let en_version = resp.version_title.as_ref().map(|title| {
            VersionMeta {
                version_title: title.clone(),
                version_title_in_hebrew: resp.version_title_in_hebrew.clone(),
                language: "en".into(),
                version_source: resp.version_source.clone(),
                version_notes: resp.version_notes.clone(),
                license: resp.license.clone(),
            }
            .normalized()
        });
        let he_version = resp.he_version_title.as_ref().map(|title| {
            VersionMeta {
                version_title: title.clone(),
                version_title_in_hebrew: resp.he_version_title_in_hebrew.clone(),
                language: "he".into(),
                version_source: resp.he_version_source.clone(),
                version_notes: resp.he_version_notes.clone(),
                license: resp.he_license.clone(),
            }
            .normalized()
        });
        TextEntry {
            section_ref: resp.section_ref.unwrap_or_else(|| resp.ref_str.clone()),
            ref_str: resp.ref_str,
            he_ref: resp.he_ref,
            book: resp.book,
            sections: resp.sections,
            to_sections: resp.to_sections,
            text: resp.text,
            he: resp.he,
            en_version,
            he_version,
            next: resp.next,
            prev: resp.prev,
            is_spanning: resp.is_spanning,
            spanning_refs: resp.spanning_refs,
        }
    }

    /// Number of segment slots this payload holds at its top level,
    /// accounting for the two languages being ragged.
    pub fn segment_slots(&self) -> usize {
        self.text.len().max(self.he.len())
    }

    /// True when the payload carries multiple segments (section-level data)
    /// rather than a single segment's string.
    pub fn is_section_level(&self) -> bool {
        !self.text.is_leaf() || !self.he.is_leaf()
    }

    /// True when the segment at zero-based `i` has content in either
    /// language.
    pub fn segment_has_content(&self, i: usize) -> bool {
        !self.text.child_or_empty(i).is_empty() || !self.he.child_or_empty(i).is_empty()
    }
}
