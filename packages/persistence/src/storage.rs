//! Key/value storage capability

use crate::StorageError;
use std::collections::BTreeMap;

/// Synchronous string key/value store (browser `localStorage` shaped)
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Every key currently stored
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory storage with an optional byte quota and injectable faults
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,

    /// Maximum total size of keys and values, in bytes
    quota: Option<usize>,

    /// Number of upcoming writes that fail regardless of quota
    failing_writes: usize,

    unreadable: bool,
    write_attempts: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Fail the next `count` writes with [`StorageError::Unavailable`]
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }

    /// Make every read fail
    pub fn set_unreadable(&mut self, unreadable: bool) {
        self.unreadable = unreadable;
    }

    /// Calls to `set`, successful or not
    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    /// Store a value bypassing quota and fault injection
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes used, not counting `excluding`
    fn used_bytes(&self, excluding: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != excluding)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unreadable {
            return Err(StorageError::Unavailable("storage is not readable".to_string()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_attempts += 1;

        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StorageError::Unavailable(format!("write to {key} rejected")));
        }

        if let Some(quota) = self.quota {
            if self.used_bytes(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded(key.to_string()));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        if self.unreadable {
            return Err(StorageError::Unavailable("storage is not readable".to_string()));
        }
        Ok(self.entries.keys().cloned().collect())
    }
}
