use crate::error::StoreError;
use crate::store::KeyValueStore;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Key-value store backed by the `settings` table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = super::init_db(path)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        super::run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, now()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ADMIN_UNLOCKED_KEY, LAST_RESULT_KEY, PLAYER_NAME_KEY};

    #[test]
    fn test_set_and_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("test.db")).unwrap();

        assert_eq!(store.get(PLAYER_NAME_KEY).unwrap(), None);
        store.set(PLAYER_NAME_KEY, "Anna").unwrap();
        assert_eq!(store.get(PLAYER_NAME_KEY).unwrap().as_deref(), Some("Anna"));
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("test.db")).unwrap();

        store.set(LAST_RESULT_KEY, "first").unwrap();
        store.set(LAST_RESULT_KEY, "second").unwrap();
        assert_eq!(store.get(LAST_RESULT_KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("test.db")).unwrap();

        store.set(ADMIN_UNLOCKED_KEY, "1").unwrap();
        store.remove(ADMIN_UNLOCKED_KEY).unwrap();
        assert_eq!(store.get(ADMIN_UNLOCKED_KEY).unwrap(), None);
        store.remove(ADMIN_UNLOCKED_KEY).unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set(PLAYER_NAME_KEY, "Chris").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get(PLAYER_NAME_KEY).unwrap().as_deref(), Some("Chris"));
    }

    #[test]
    fn test_in_memory_connection() {
        let store = SqliteStore::from_connection(Connection::open_in_memory().unwrap()).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
