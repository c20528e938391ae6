use thiserror::Error;

/// Failures on the write path or the storage medium itself. Corrupt slot
/// contents are not an error on load; they read back as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
