//! Related-content wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A title in both interface languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleByLang {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub he: String,
}

/// A commentary/citation link anchored somewhere in the requested ref.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    /// The ref this link was created against; may be a range.
    #[serde(default)]
    pub anchor_ref: String,
    /// The anchor's constituent segment refs, when the anchor is a range.
    #[serde(default)]
    pub anchor_ref_expanded: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub collective_title: TitleByLang,
    #[serde(default, rename = "type")]
    pub link_type: String,
    /// Root index title of the linked work.
    #[serde(default, rename = "index_title")]
    pub index_title: String,
    /// The other end of the link.
    #[serde(default)]
    pub source_ref: String,
    #[serde(default)]
    pub source_has_en: bool,
}

impl LinkItem {
    /// The name a link is book-bucketed under: the collective title where
    /// one exists (all of Rashi is one bucket), the index title otherwise.
    pub fn book_name(&self) -> &str {
        if self.collective_title.en.is_empty() { &self.index_title } else { &self.collective_title.en }
    }
}

/// A user note anchored to a ref.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteItem {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default, rename = "ref")]
    pub ref_str: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub owner_name: Option<String>,
}

/// A source sheet that cites a ref.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub anchor_ref: String,
    #[serde(default)]
    pub anchor_ref_expanded: Vec<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub views: u64,
}

/// Everything the related endpoint returns for one ref. The lists this
/// engine doesn't interpret are carried through as raw values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedBundle {
    #[serde(default)]
    pub links: Vec<LinkItem>,
    #[serde(default)]
    pub notes: Vec<NoteItem>,
    #[serde(default)]
    pub sheets: Vec<SheetItem>,
    #[serde(default)]
    pub webpages: Vec<Value>,
    #[serde(default)]
    pub topics: Vec<Value>,
    #[serde(default)]
    pub media: Vec<Value>,
    #[serde(default)]
    pub manuscripts: Vec<Value>,
}

impl RelatedBundle {
    /// Total items in the typed lists.
    pub fn len(&self) -> usize {
        self.links.len() + self.notes.len() + self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
            && self.webpages.is_empty()
            && self.topics.is_empty()
            && self.media.is_empty()
            && self.manuscripts.is_empty()
    }
}

/// Items that are anchored to a ref, possibly expanded over a range.
pub trait Anchored {
    /// The single-ref anchor, possibly a range.
    fn primary_anchor(&self) -> &str;
    /// Constituent segment refs, when the server expanded the anchor.
    fn expanded_anchors(&self) -> &[String];
}

impl Anchored for LinkItem {
    fn primary_anchor(&self) -> &str {
        &self.anchor_ref
    }
    fn expanded_anchors(&self) -> &[String] {
        &self.anchor_ref_expanded
    }
}

impl Anchored for SheetItem {
    fn primary_anchor(&self) -> &str {
        &self.anchor_ref
    }
    fn expanded_anchors(&self) -> &[String] {
        &self.anchor_ref_expanded
    }
}

impl Anchored for NoteItem {
    fn primary_anchor(&self) -> &str {
        &self.ref_str
    }
    fn expanded_anchors(&self) -> &[String] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_related_payload() {
        let bundle: RelatedBundle = serde_json::from_str(
            r#"{
                "links": [{
                    "_id": "abc123",
                    "anchorRef": "Genesis 1:4-5",
                    "anchorRefExpanded": ["Genesis 1:4", "Genesis 1:5"],
                    "category": "Commentary",
                    "collectiveTitle": {"en": "Rashi", "he": "רש״י"},
                    "type": "commentary",
                    "index_title": "Rashi on Genesis",
                    "sourceRef": "Rashi on Genesis 1:4:1",
                    "sourceHasEn": true
                }],
                "sheets": [{"id": 7, "title": "Creation", "anchorRef": "Genesis 1:4"}],
                "topics": [{"slug": "creation"}]
            }"#,
        )
        .unwrap();
        assert_eq!(bundle.links.len(), 1);
        assert_eq!(bundle.links[0].book_name(), "Rashi");
        assert_eq!(bundle.links[0].expanded_anchors().len(), 2);
        assert_eq!(bundle.sheets[0].primary_anchor(), "Genesis 1:4");
        assert_eq!(bundle.topics.len(), 1);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn book_name_falls_back_to_index_title() {
        let link = LinkItem { index_title: "Midrash Rabbah".into(), ..LinkItem::default() };
        assert_eq!(link.book_name(), "Midrash Rabbah");
    }
}
