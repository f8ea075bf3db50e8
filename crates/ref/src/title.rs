//! The dictionary of known works.
//!
//! Parsing a citation starts by finding the longest known title at the
//! front of the query. The [`TitleIndex`] holds every title (primary and
//! alternates) the parser may match, plus the per-work metadata the rest
//! of the engine needs: section depth, addressing scheme, category and
//! corpus. A client normally populates it from the table-of-contents API
//! at startup; tests use the compact fixture set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a work's top-level sections are addressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Addressing {
    /// Plain integers ("Genesis 3").
    #[default]
    Integer,
    /// Two-sided folio pages ("Shabbat 15a").
    Folio,
}

/// Metadata for a single known work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    /// Primary English title, as matched in citations.
    pub title: String,
    /// Root index title; differs from `title` for nested/complex works.
    #[serde(default)]
    pub index_title: String,
    /// Alternate titles that resolve to the same work.
    #[serde(default)]
    pub alt_titles: Vec<String>,
    /// Primary category ("Tanakh", "Talmud", "Commentary", ...).
    #[serde(default)]
    pub primary_category: String,
    /// Corpus the work belongs to, for per-corpus version preferences.
    #[serde(default)]
    pub corpus: Option<String>,
    /// Collective title for commentaries ("Rashi"), if any.
    #[serde(default)]
    pub collective_title: Option<String>,
    /// Names of the section levels, leaf last ("Chapter", "Verse").
    pub section_names: Vec<String>,
    #[serde(default)]
    pub addressing: Addressing,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, section_names: &[&str]) -> Self {
        let title = title.into();
        Self {
            index_title: title.clone(),
            title,
            alt_titles: Vec::new(),
            primary_category: String::new(),
            corpus: None,
            collective_title: None,
            section_names: section_names.iter().map(|s| s.to_string()).collect(),
            addressing: Addressing::Integer,
        }
    }

    /// Number of addressable levels (sections plus the leaf segment level).
    pub fn depth(&self) -> usize {
        self.section_names.len()
    }
}

/// Lookup table from titles to work records, with the category ordering
/// used when summarizing connections.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    records: Vec<BookRecord>,
    /// Lowercased title → index into `records`.
    by_title: HashMap<String, usize>,
    category_order: Vec<String>,
}

impl TitleIndex {
    /// Build an index from work records. Later records win title
    /// collisions, matching reload-from-server behavior.
    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Self {
        let mut index = Self {
            records: Vec::new(),
            by_title: HashMap::new(),
            category_order: default_category_order(),
        };
        for record in records {
            index.insert(record);
        }
        index
    }

    pub fn insert(&mut self, record: BookRecord) {
        let slot = self.records.len();
        self.by_title.insert(record.title.to_lowercase(), slot);
        for alt in &record.alt_titles {
            self.by_title.insert(alt.to_lowercase(), slot);
        }
        self.records.push(record);
    }

    /// Case-insensitive exact-title lookup.
    pub fn get(&self, title: &str) -> Option<&BookRecord> {
        self.by_title.get(&title.to_lowercase()).map(|&i| &self.records[i])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Find the longest known title covering a prefix of `words`, requiring
    /// the match to end at a word boundary. Returns the record and the
    /// number of words consumed. "Job" will never match inside "Jobs":
    /// candidates are whole-word prefixes only.
    pub fn match_title<'a>(&'a self, words: &[&str]) -> Option<(&'a BookRecord, usize)> {
        for take in (1..=words.len()).rev() {
            let candidate = words[..take].join(" ");
            if let Some(record) = self.get(&candidate) {
                return Some((record, take));
            }
        }
        None
    }

    /// Global category ordering (table-of-contents order).
    pub fn category_order(&self) -> &[String] {
        &self.category_order
    }

    pub fn set_category_order(&mut self, order: Vec<String>) {
        self.category_order = order;
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }
}

fn default_category_order() -> Vec<String> {
    [
        "Tanakh",
        "Mishnah",
        "Talmud",
        "Midrash",
        "Halakhah",
        "Kabbalah",
        "Liturgy",
        "Jewish Thought",
        "Tosefta",
        "Chasidut",
        "Musar",
        "Responsa",
        "Second Temple",
        "Reference",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
