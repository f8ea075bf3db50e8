//! Per-corpus version preferences.
//!
//! When a reader picks a translation for one book, the choice applies to
//! the whole corpus the book belongs to. The preference map is a small
//! immutable value object: every update produces a new instance and
//! persists itself through a [`PreferenceStore`], its only side effect.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::instrument;

/// Storage key for the preference map.
pub const VERSION_PREFS_KEY: &str = "version_preferences_by_corpus";

/// Key-value persistence for small client-side state blobs.
///
/// Implementations hold JSON strings under stable names. The JSON shape
/// is owned by the value types, not the store.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// File-per-key JSON store rooted at a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path).map(Some).or_raise(|| ErrorKind::Io)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).or_raise(|| ErrorKind::Io)?;
        std::fs::write(self.path_for(key), value).or_raise(|| ErrorKind::Io)
    }
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// corpus → language → preferred version title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionPreferences(BTreeMap<String, BTreeMap<String, String>>);

impl VersionPreferences {
    /// Load the persisted map, or an empty one if nothing was saved yet.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self> {
        match store.load(VERSION_PREFS_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).or_raise(|| ErrorKind::InvalidData(VERSION_PREFS_KEY.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn version_for(&self, corpus: &str, language: &str) -> Option<&str> {
        self.0.get(corpus)?.get(language).map(String::as_str)
    }

    /// Produce a new preference map with one entry changed, persisting it
    /// before returning. `self` is untouched — callers swap in the
    /// returned instance once the save has succeeded, so a failed save
    /// never leaves a half-applied state.
    #[instrument(skip(self, store))]
    pub fn update(
        &self,
        corpus: &str,
        language: &str,
        version_title: &str,
        store: &dyn PreferenceStore,
    ) -> Result<Self> {
        let mut next = self.clone();
        next.0.entry(corpus.to_string()).or_default().insert(language.to_string(), version_title.to_string());
        let raw = serde_json::to_string(&next).or_raise(|| ErrorKind::InvalidData(VERSION_PREFS_KEY.to_string()))?;
        store.save(VERSION_PREFS_KEY, &raw)?;
        Ok(next)
    }
}
