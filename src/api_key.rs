use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide Gemini API key. Empty means "not set".
#[derive(Debug)]
pub struct ApiKeyStore {
    key: RwLock<String>,
}

impl ApiKeyStore {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            key: RwLock::new(initial.into()),
        }
    }

    // A poisoned lock still holds a valid String.
    fn read(&self) -> RwLockReadGuard<'_, String> {
        self.key.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, String> {
        self.key.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current key; callers keep using it even if it changes later.
    pub fn get(&self) -> Option<String> {
        let key = self.read();
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }

    pub fn is_set(&self) -> bool {
        !self.read().is_empty()
    }

    pub fn set(&self, key: impl Into<String>) {
        *self.write() = key.into();
    }

    /// Clears the key only if it still equals `expected`. Returns whether it was cleared.
    pub fn clear_if(&self, expected: &str) -> bool {
        let mut key = self.write();
        if *key == expected {
            key.clear();
            true
        } else {
            false
        }
    }
}
