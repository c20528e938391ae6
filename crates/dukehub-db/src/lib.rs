pub mod error;
pub mod memory;
pub mod migrations;
pub mod queries;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub use error::StoreError;
pub use memory::MemoryStore;

/// Key/value durable storage. Values are opaque strings (JSON in practice).
///
/// Every `save_raw` must be durable when it returns; callers never batch.
pub trait PersistentStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed JSON access on top of any [`PersistentStore`].
pub trait StoreExt: PersistentStore {
    /// Load and decode a slot. Missing and undecodable slots both come back
    /// as `Ok(None)`; only failures of the medium itself are errors.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.load_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Slot '{}' is malformed, treating as empty: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Like [`StoreExt::load`], but an undecodable value is first copied to
    /// `<key>.corrupt` so a later save to `key` cannot destroy it.
    fn load_or_quarantine<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.load_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let backup = format!("{key}.corrupt");
                self.save_raw(&backup, &raw)?;
                warn!(
                    "Slot '{}' is malformed, treating as empty; original kept in '{}': {}",
                    key, backup, e
                );
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.save_raw(key, &raw)
    }
}

impl<S: PersistentStore + ?Sized> StoreExt for S {}

impl<S: PersistentStore + ?Sized> PersistentStore for Arc<S> {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: PersistentStore + ?Sized> PersistentStore for &S {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// SQLite-backed store. One row per slot.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        // Each save must survive a crash right after it returns
        conn.pragma_update(None, "synchronous", "FULL")?;

        migrations::run(&conn)?;

        info!("Store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }
}

impl PersistentStore for Database {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_slot(key)
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_slot(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.delete_slot(key)
    }
}
