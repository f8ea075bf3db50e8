//! Reading-history fallback for signed-out sessions.
//!
//! Signed-in users get server-side history; without an account the
//! history lives only in local client state. Bounded, newest first,
//! deduplicated by ref.

use exn::ResultExt;
use mikra_text::PreferenceStore;
use mikra_text::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Storage key for the history list.
pub const USER_HISTORY_KEY: &str = "user_history";
/// Signed-out history is capped; the server owns long-term history.
const HISTORY_CAP: usize = 100;

/// One visited ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "ref")]
    pub ref_str: String,
    pub book: String,
    /// Unix timestamp of the visit.
    pub time_stamp: i64,
}

/// The signed-out reading history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingHistory(Vec<HistoryItem>);

impl ReadingHistory {
    pub fn load(store: &dyn PreferenceStore) -> Result<Self> {
        match store.load(USER_HISTORY_KEY)? {
            Some(raw) => serde_json::from_str(&raw).or_raise(|| ErrorKind::InvalidData(USER_HISTORY_KEY.to_string())),
            None => Ok(Self::default()),
        }
    }

    /// Record a visit: moves an existing entry for the same ref to the
    /// front, trims to the cap, persists.
    pub fn record(&mut self, item: HistoryItem, store: &dyn PreferenceStore) -> Result<()> {
        self.0.retain(|existing| existing.ref_str != item.ref_str);
        self.0.insert(0, item);
        self.0.truncate(HISTORY_CAP);
        let raw = serde_json::to_string(&self).or_raise(|| ErrorKind::InvalidData(USER_HISTORY_KEY.to_string()))?;
        store.save(USER_HISTORY_KEY, &raw)
    }

    /// Newest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mikra_text::MemoryStore;

    fn item(ref_str: &str, time_stamp: i64) -> HistoryItem {
        HistoryItem { ref_str: ref_str.into(), book: "Genesis".into(), time_stamp }
    }

    #[test]
    fn revisits_move_to_the_front() {
        let store = MemoryStore::new();
        let mut history = ReadingHistory::default();
        history.record(item("Genesis.1.1", 1), &store).unwrap();
        history.record(item("Genesis.2.1", 2), &store).unwrap();
        history.record(item("Genesis.1.1", 3), &store).unwrap();

        let refs: Vec<&str> = history.items().iter().map(|i| i.ref_str.as_str()).collect();
        assert_eq!(refs, vec!["Genesis.1.1", "Genesis.2.1"]);
        assert_eq!(history.items()[0].time_stamp, 3);
    }

    #[test]
    fn history_is_bounded() {
        let store = MemoryStore::new();
        let mut history = ReadingHistory::default();
        for i in 0..150 {
            history.record(item(&format!("Genesis.1.{i}"), i), &store).unwrap();
        }
        assert_eq!(history.items().len(), 100);
        // Newest survive.
        assert_eq!(history.items()[0].ref_str, "Genesis.1.149");
    }

    #[test]
    fn persists_and_reloads() {
        let store = MemoryStore::new();
        let mut history = ReadingHistory::default();
        history.record(item("Genesis.1.1", 1), &store).unwrap();

        assert_eq!(ReadingHistory::load(&store).unwrap(), history);
    }
}
