//! # Storage Port
//!
//! Byte-keyed key-value access consumed by every native component, plus the
//! staging overlay that gives each invocation all-or-nothing semantics.
//!
//! ```text
//! base store (committed) ──read──▶ StagedStore ──into_change_set──▶ ChangeSet
//!                                    ▲    │                              │
//!                              put/delete │                              │
//!                                    └────┘       apply on success ◀─────┘
//! ```

use std::collections::BTreeMap;

use crate::errors::StorageError;

/// Key-value storage interface.
///
/// Keys are namespaced by the caller, normally with a contract address
/// prefix built by [`concat_key`].
pub trait KvStore {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write a value.
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;

    /// True if the key holds a value.
    fn contains(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Concatenate key segments.
pub fn concat_key(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut key = Vec::with_capacity(len);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Ordered in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys starting with `prefix`, in ascending order.
    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// STAGING OVERLAY
// =============================================================================

/// Write buffer over a read-only snapshot.
///
/// Reads see staged writes first, then the base. Nothing reaches the base
/// until the resulting [`ChangeSet`] is applied.
pub struct StagedStore<'a> {
    base: &'a dyn KvStore,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StagedStore<'a> {
    /// Stage writes over `base`.
    pub fn new(base: &'a dyn KvStore) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Number of staged puts and deletes.
    pub fn staged_len(&self) -> usize {
        self.writes.len()
    }

    /// Drop the overlay and keep its writes.
    pub fn into_change_set(self) -> ChangeSet {
        ChangeSet {
            writes: self.writes,
        }
    }
}

impl KvStore for StagedStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError> {
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }
}

/// Writes produced by one successful invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl ChangeSet {
    /// Number of puts and deletes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// True if the invocation wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Apply every write to `store` in key order.
    pub fn apply(self, store: &mut dyn KvStore) -> Result<(), StorageError> {
        for (key, value) in self.writes {
            match value {
                Some(v) => store.put(&key, v)?,
                None => store.delete(&key)?,
            }
        }
        Ok(())
    }
}
