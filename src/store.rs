use crate::error::StoreError;
use std::cell::RefCell;
use std::collections::HashMap;

pub const PLAYER_NAME_KEY: &str = "quiz.player_name";
pub const LAST_RESULT_KEY: &str = "quiz.last_result_id";
pub const ADMIN_UNLOCKED_KEY: &str = "admin.unlocked";

/// Small persisted key-value store for values that must survive restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read a key, treating store failures as "not set".
pub fn read_or_none(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted key");
            None
        }
    }
}

pub fn write_or_log(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "failed to persist key");
    }
}

pub fn remove_or_log(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "failed to remove persisted key");
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
