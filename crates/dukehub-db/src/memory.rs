use std::collections::HashMap;
use std::sync::Mutex;

use crate::PersistentStore;
use crate::error::StoreError;

/// Process-local store. Nothing outlives the process; useful for tests and
/// throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> Result<usize, StoreError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(slots.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl PersistentStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreExt;
    use std::sync::Arc;

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());
        store.save("posts", &vec!["a", "b"]).unwrap();
        let posts: Option<Vec<String>> = store.load("posts").unwrap();
        assert_eq!(posts, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn poisoned_lock_is_an_error_not_empty() {
        let store = Arc::new(MemoryStore::new());
        store.save_raw("users", "[]").unwrap();

        let held = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = held.slots.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::LockPoisoned(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::LockPoisoned(_))));
        assert!(matches!(store.load_raw("users"), Err(StoreError::LockPoisoned(_))));
    }
}
