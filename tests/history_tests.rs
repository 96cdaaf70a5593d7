//! 历史记录持久化集成测试（FileStore + tempfile）

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::TempDir;

use shortlink_relay::history::{
    FileStore, HISTORY_CAPACITY, HISTORY_KEY, HistoryEntry, HistoryStore, KeyValueStore,
};

fn entry(id: &str, minutes_ago: i64) -> HistoryEntry {
    HistoryEntry {
        id: id.to_string(),
        original_url: format!("https://example.com/{}", id),
        short_url: format!("https://rebrand.ly/{}", id),
        custom_slug: None,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        provider_id: format!("p-{}", id),
    }
}

fn open(dir: &TempDir) -> HistoryStore {
    HistoryStore::load(Arc::new(FileStore::new(dir.path())))
}

#[test]
fn test_history_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut store = open(&dir);
    assert!(store.is_empty());
    store.record(entry("a", 2));
    store.record(entry("b", 1));
    drop(store);

    let store = open(&dir);
    let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_history_is_capped_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);

    for i in 0..(HISTORY_CAPACITY + 5) {
        store.record(entry(&format!("e{}", i), 0));
    }
    assert_eq!(store.len(), HISTORY_CAPACITY);

    let raw = FileStore::new(dir.path()).get(HISTORY_KEY).unwrap().unwrap();
    let persisted: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.len(), HISTORY_CAPACITY);
    assert_eq!(persisted[0]["id"], format!("e{}", HISTORY_CAPACITY + 4));
    assert_eq!(persisted[0]["shortUrl"], format!("https://rebrand.ly/e{}", HISTORY_CAPACITY + 4));
}

#[test]
fn test_remove_and_clear_persist() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.record(entry("a", 1));
    store.record(entry("b", 0));

    store.remove("a");
    assert_eq!(open(&dir).len(), 1);

    store.clear();
    assert!(open(&dir).is_empty());
}

#[test]
fn test_legacy_file_is_readable() {
    let dir = TempDir::new().unwrap();
    let backend = FileStore::new(dir.path());
    let legacy = json!([
        {
            "id": 1714557600000u64,
            "originalUrl": "https://example.com",
            "shortUrl": "https://rebrand.ly/old",
            "customSlug": "old",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "rebrandlyId": "legacy"
        },
        {"garbage": true}
    ]);
    backend.set(HISTORY_KEY, &legacy.to_string()).unwrap();

    let store = open(&dir);
    assert_eq!(store.len(), 1);
    let only = &store.entries()[0];
    assert_eq!(only.id, "1714557600000");
    assert_eq!(only.custom_slug.as_deref(), Some("old"));
    assert_eq!(only.provider_id, "legacy");
}

#[test]
fn test_corrupt_file_starts_empty_and_recovers() {
    let dir = TempDir::new().unwrap();
    std::fs::write(FileStore::new(dir.path()).path_for(HISTORY_KEY), "{{{ not json").unwrap();

    let mut store = open(&dir);
    assert!(store.is_empty());
    assert!(!store.is_degraded());

    store.record(entry("fresh", 0));
    assert_eq!(open(&dir).len(), 1);
}
