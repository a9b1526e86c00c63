//! Short-lived preview draft store.
//!
//! The editor hands a draft off to the preview view through an explicit,
//! keyed, TTL-bound store rather than an unscoped shared slot: every preview
//! gets its own key at creation and the entry expires on its own.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default maximum number of parked drafts.
const DEFAULT_CAPACITY: u64 = 1_000;

/// Default time-to-live for a parked draft (15 minutes).
const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// An unsaved post handed off for preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Short description.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Featured image URL.
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Publish flag as toggled in the editor.
    #[serde(default)]
    pub published: bool,
}

/// Keyed in-memory store for preview drafts.
///
/// Thread-safe; entries expire after the configured TTL and the store is
/// capacity-bounded, so an abandoned preview leaks nothing.
#[derive(Clone)]
pub struct DraftStore {
    cache: Cache<Uuid, Arc<Draft>>,
}

impl DraftStore {
    /// Creates a draft store with default settings (1000 entries, 15 min TTL).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Creates a draft store with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Parks a draft and returns its preview key.
    #[must_use]
    pub fn put(&self, draft: Draft) -> Uuid {
        let id = Uuid::new_v4();
        self.cache.insert(id, Arc::new(draft));
        id
    }

    /// Fetches a parked draft; `None` once expired or unknown.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Arc<Draft>> {
        self.cache.get(&id)
    }

    /// Drops a parked draft early.
    pub fn remove(&self, id: Uuid) {
        self.cache.invalidate(&id);
    }

    /// Number of parked drafts.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> Draft {
        Draft {
            title: title.to_string(),
            content: "body".to_string(),
            excerpt: None,
            featured_image: None,
            images: Vec::new(),
            published: false,
        }
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = DraftStore::new();
        let id = store.put(draft("Preview me"));

        let fetched = store.get(id).expect("draft should be present");
        assert_eq!(fetched.title, "Preview me");
    }

    #[test]
    fn test_unknown_key_is_none() {
        let store = DraftStore::new();
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_every_preview_gets_its_own_key() {
        let store = DraftStore::new();
        let first = store.put(draft("one"));
        let second = store.put(draft("two"));

        assert_ne!(first, second);
        assert_eq!(store.get(first).unwrap().title, "one");
        assert_eq!(store.get(second).unwrap().title, "two");
    }

    #[test]
    fn test_entries_expire() {
        let store = DraftStore::with_config(10, Duration::from_millis(50));
        let id = store.put(draft("fleeting"));

        assert!(store.get(id).is_some());
        std::thread::sleep(Duration::from_millis(80));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_remove_drops_entry() {
        let store = DraftStore::new();
        let id = store.put(draft("gone"));
        store.remove(id);
        assert!(store.get(id).is_none());
    }
}
