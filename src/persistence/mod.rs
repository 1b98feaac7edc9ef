//! Local key-value persistence
//!
//! Scalar records that survive across sessions on the same device:
//! - Best score
//! - Last selected character
//!
//! Backed by LocalStorage in the browser (`platform::LocalStorageStore`) and
//! by `MemoryStore` in tests and native runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Typed records on top of a key-value store
pub struct LocalRecords {
    store: Rc<dyn KeyValueStore>,
}

impl LocalRecords {
    pub const HIGH_SCORE_KEY: &'static str = "barkour_highscore";
    pub const CHARACTER_KEY: &'static str = "barkour_character";

    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Missing or unparsable values read as 0
    fn read_number(&self, key: &str) -> u64 {
        self.store
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn high_score(&self) -> u64 {
        self.read_number(Self::HIGH_SCORE_KEY)
    }

    pub fn set_high_score(&self, score: u64) {
        self.store.set(Self::HIGH_SCORE_KEY, &score.to_string());
        log::info!("High score saved: {score}");
    }

    pub fn selected_character(&self) -> usize {
        self.read_number(Self::CHARACTER_KEY) as usize
    }

    pub fn set_selected_character(&self, index: usize) {
        self.store.set(Self::CHARACTER_KEY, &index.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_read_as_zero() {
        let records = LocalRecords::new(Rc::new(MemoryStore::new()));
        assert_eq!(records.high_score(), 0);
        assert_eq!(records.selected_character(), 0);
    }

    #[test]
    fn test_garbage_reads_as_zero() {
        let store = MemoryStore::new();
        store.set(LocalRecords::HIGH_SCORE_KEY, "not a number");
        let records = LocalRecords::new(Rc::new(store));
        assert_eq!(records.high_score(), 0);
    }

    #[test]
    fn test_round_trip_through_shared_store() {
        let store = MemoryStore::new();
        let records = LocalRecords::new(Rc::new(store.clone()));
        records.set_high_score(1234);
        records.set_selected_character(1);

        assert_eq!(store.get("barkour_highscore").as_deref(), Some("1234"));
        let reopened = LocalRecords::new(Rc::new(store));
        assert_eq!(reopened.high_score(), 1234);
        assert_eq!(reopened.selected_character(), 1);
    }
}
