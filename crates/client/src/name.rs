//! Name resolution: is this string a ref, a book, a topic, or a search?

use serde::{Deserialize, Serialize};

/// The name endpoint's verdict on a query string, used to route a search
/// box entry to the reader, a topic page, or full-text search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameResponse {
    #[serde(default)]
    pub is_ref: bool,
    #[serde(default)]
    pub is_book: bool,
    #[serde(default)]
    pub is_node: bool,
    /// Normalized ref, when the query resolved to one.
    #[serde(default, rename = "ref")]
    pub ref_str: Option<String>,
    #[serde(default)]
    pub book: Option<String>,
    /// Topic slug, when the query names a topic instead of a text.
    #[serde(default)]
    pub topic_slug: Option<String>,
    /// Autocomplete suggestions.
    #[serde(default)]
    pub completions: Vec<String>,
}
