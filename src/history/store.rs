use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::KeyValueStore;
use super::entry::{HistoryEntry, parse_entries};

/// Storage key of the persisted list
pub const HISTORY_KEY: &str = "shortlink-history";

/// Maximum number of remembered links
pub const HISTORY_CAPACITY: usize = 10;

/// Capped, newest-first history.
///
/// Every mutation rewrites the whole persisted list. If storage fails once,
/// the store logs it and keeps going in memory only for the rest of the
/// session.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    degraded: bool,
}

impl HistoryStore {
    /// Read the persisted list. Absent or malformed data gives an empty list.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            storage,
            entries: Vec::new(),
            degraded: false,
        };

        match store.storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => {
                let mut entries = parse_entries(&raw);
                entries.truncate(HISTORY_CAPACITY);
                store.entries = entries;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "History storage ({}) unavailable, keeping history in memory: {}",
                    store.storage.name(),
                    e
                );
                store.degraded = true;
            }
        }

        debug!("Loaded {} history entries", store.entries.len());
        store
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether storage has failed and the store runs in memory only
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Prepend, keep the newest `HISTORY_CAPACITY`, persist.
    pub fn record(&mut self, entry: HistoryEntry) -> &[HistoryEntry] {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist();
        &self.entries
    }

    /// Drop the entry with `id`. Unknown ids leave the list untouched.
    pub fn remove(&mut self, id: &str) -> &[HistoryEntry] {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() != before {
            self.persist();
        }
        &self.entries
    }

    /// Empty the list and delete the persisted record.
    /// The delete is attempted even when the store is degraded.
    pub fn clear(&mut self) {
        self.entries.clear();
        match self.storage.remove(HISTORY_KEY) {
            Ok(()) => debug!("Cleared persisted history"),
            Err(e) if self.degraded => debug!("History delete failed while degraded: {}", e),
            Err(e) => self.degrade(&e),
        }
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let serialized = match serde_json::to_string(&self.entries) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize history: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(HISTORY_KEY, &serialized) {
            self.degrade(&e);
        }
    }

    fn degrade(&mut self, err: &crate::errors::RelayError) {
        warn!(
            "History storage ({}) failed, continuing in memory only: {}",
            self.storage.name(),
            err
        );
        self.degraded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RelayError, Result};
    use crate::history::MemoryStore;
    use chrono::Utc;

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            original_url: format!("https://example.com/{}", id),
            short_url: format!("https://rebrand.ly/{}", id),
            custom_slug: None,
            created_at: Utc::now(),
            provider_id: format!("p-{}", id),
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(RelayError::file_operation("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(RelayError::file_operation("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(RelayError::file_operation("disk on fire"))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    /// reads fine, fails on write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(RelayError::file_operation("read-only"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(RelayError::file_operation("read-only"))
        }
        fn name(&self) -> &'static str {
            "read-only"
        }
    }

    /// get always fails, writes go to the wrapped store
    struct FlakyReadStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for FlakyReadStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(RelayError::file_operation("transient read error"))
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
        fn name(&self) -> &'static str {
            "flaky-read"
        }
    }

    #[test]
    fn test_record_caps_at_ten_newest_first() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = HistoryStore::load(storage.clone());

        for i in 1..=11 {
            store.record(entry(&i.to_string()));
        }

        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "10", "9", "8", "7", "6", "5", "4", "3", "2"]);

        let reloaded = HistoryStore::load(storage);
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut store = HistoryStore::load(Arc::new(MemoryStore::new()));
        store.record(entry("a"));
        store.record(entry("b"));

        let before = store.entries().to_vec();
        let after = store.remove("zzz").to_vec();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = HistoryStore::load(storage.clone());
        store.record(entry("a"));
        store.record(entry("b"));
        store.remove("a");

        let reloaded = HistoryStore::load(storage);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get("b").is_some());
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = HistoryStore::load(storage.clone());
        store.record(entry("a"));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(storage.get(HISTORY_KEY).unwrap(), None);
        assert!(HistoryStore::load(storage).is_empty());
    }

    #[test]
    fn test_malformed_persisted_data_loads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(HISTORY_KEY, "{not json").unwrap();
        let store = HistoryStore::load(storage);
        assert!(store.is_empty());
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_oversized_persisted_list_is_truncated() {
        let storage = Arc::new(MemoryStore::new());
        let many: Vec<HistoryEntry> = (0..15).map(|i| entry(&i.to_string())).collect();
        storage
            .set(HISTORY_KEY, &serde_json::to_string(&many).unwrap())
            .unwrap();

        let store = HistoryStore::load(storage);
        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.entries()[0].id, "0");
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let mut store = HistoryStore::load(Arc::new(BrokenStore));
        assert!(store.is_degraded());

        store.record(entry("a"));
        store.record(entry("b"));
        assert_eq!(store.len(), 2);
        store.remove("a");
        assert_eq!(store.len(), 1);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_after_read_failure_deletes_record() {
        let storage = Arc::new(FlakyReadStore {
            inner: MemoryStore::new(),
        });
        let old = serde_json::to_string(&vec![entry("stale")]).unwrap();
        storage.inner.set(HISTORY_KEY, &old).unwrap();

        let mut store = HistoryStore::load(storage.clone());
        assert!(store.is_degraded());
        assert!(store.is_empty());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(storage.inner.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_write_failure_degrades_without_losing_entry() {
        let mut store = HistoryStore::load(Arc::new(ReadOnlyStore));
        assert!(!store.is_degraded());

        store.record(entry("a"));
        assert!(store.is_degraded());
        assert_eq!(store.len(), 1);
    }
}
