//! Version metadata, as returned by the texts and versions endpoints.

use serde::{Deserialize, Serialize};

/// Metadata for a single text version (one translation or edition).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMeta {
    #[serde(default)]
    pub version_title: String,
    #[serde(default)]
    pub version_title_in_hebrew: Option<String>,
    /// "en" or "he" on the wire.
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version_source: Option<String>,
    #[serde(default)]
    pub version_notes: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

impl VersionMeta {
    /// Normalize a wire record: blank optional fields collapse to `None`
    /// so equality and display logic don't have to treat `""` and absent
    /// as different states.
    pub fn normalized(mut self) -> Self {
        for field in [&mut self.version_title_in_hebrew, &mut self.version_source, &mut self.version_notes, &mut self.license]
        {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }

    pub fn is_hebrew(&self) -> bool {
        self.language == "he"
    }
}
