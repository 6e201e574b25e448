use std::collections::HashMap;

use thiserror::Error;

/// Key holding the visitor's name exactly as typed.
pub const VISITOR_NAME_KEY: &str = "visitorName";
/// Key holding `"true"` once the seal has been broken at least once.
pub const DEBUG_UNLOCKED_KEY: &str = "debugModeUnlocked";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage is unavailable")]
    Unavailable,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// String key/value storage that survives reloads.
///
/// The controller receives one at construction; nothing else touches
/// persistence. Absence of a key means "unset".
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_unset() {
        let store = MemoryStore::new();
        assert_eq!(store.get(VISITOR_NAME_KEY), None);
        assert!(store.is_empty());
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryStore::new().with_entry(VISITOR_NAME_KEY, "victoria");
        store.set(VISITOR_NAME_KEY, "Victoria").unwrap();
        assert_eq!(store.get(VISITOR_NAME_KEY).as_deref(), Some("Victoria"));
        assert_eq!(store.len(), 1);
    }
}
