use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::SnapshotStore;
use crate::error::StoreError;

/// In-process store. Clones share the same slots, so a test can keep a handle
/// while the cart owns another, and "restart" by building a new manager from it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }

    /// Makes every subsequent write fail until switched back.
    pub fn fail_writes(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.slots).keys().cloned().collect();
        keys.sort();
        keys
    }
}

// A poisoned lock still holds consistent data: every critical section is a single insert or read.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.slots).get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if *lock(&self.failing) {
            return Err(StoreError::Io {
                key: key.to_string(),
                message: "write refused".to_string(),
            });
        }
        lock(&self.slots).insert(key.to_string(), value.to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        lock(&self.slots).remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slots() {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.write("cart", "[]").unwrap();

        assert_eq!(observer.read("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(observer.write_count(), 1);
    }

    #[test]
    fn test_failing_writes_leave_slot_untouched() {
        let mut store = MemoryStore::new();
        store.write("cart", "[1]").unwrap();
        store.fail_writes(true);

        assert!(store.write("cart", "[2]").is_err());
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.write_count(), 1);
    }
}
