use rusqlite::Connection;

use crate::Database;
use crate::error::StoreError;

impl Database {
    // -- Slots --

    pub fn get_slot(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| query_slot(conn, key))
    }

    pub fn put_slot(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                (key, value),
            )?;
            Ok(())
        })
    }

    pub fn delete_slot(&self, key: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

fn query_slot(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT value FROM slots WHERE key = ?1")?;
    let row = stmt.query_row([key], |row| row.get(0)).optional()?;
    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, StoreError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, StoreError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_slot_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.put_slot("users", "[]").unwrap();
        db.put_slot("users", "[1]").unwrap();
        assert_eq!(db.get_slot("users").unwrap().as_deref(), Some("[1]"));
        let rows: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn missing_slot_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_slot("nope").unwrap().is_none());
    }
}
