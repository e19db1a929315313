use std::collections::HashMap;

use crate::error::StorageError;
use crate::traits::KeyValueStore;

/// In-process store with an optional byte quota and a switch to reject
/// writes, for exercising the failure paths of callers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected(key.to_string()));
        }
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_counts_replaced_value_once() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", b"12345").unwrap();
        store.set("k", b"123456789").unwrap();
        let err = store.set("k", b"1234567890").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 11, limit: 10 }));
        assert_eq!(store.get("k").unwrap().unwrap().len(), 9);
    }

    #[test]
    fn rejected_writes_leave_data() {
        let mut store = MemoryStore::new();
        store.set("k", b"v").unwrap();
        store.set_reject_writes(true);
        assert!(store.set("k", b"w").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"v"[..]));
    }
}
