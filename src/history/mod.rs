//! Client-side history of created short links
//!
//! A capped (10), newest-first list persisted as a flat JSON array under a
//! single key. Storage failures never reach the caller: the store logs them
//! and keeps working in memory.

mod backend;
mod entry;
mod store;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use entry::{HistoryEntry, parse_entries};
pub use store::{HISTORY_CAPACITY, HISTORY_KEY, HistoryStore};
