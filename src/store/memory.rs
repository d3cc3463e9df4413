//! In-memory reference implementation of [`OrderedStore`], backed by a
//! `BTreeMap` behind a `parking_lot::RwLock`, the same lock the teacher
//! reaches for in `database/cache_manager.rs` rather than a `std::sync`
//! equivalent. This is the default store; no feature flag required.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::OrderedStore;
use crate::error::StoreError;
use crate::hash::Hash;
use crate::node_key::NodeKey;

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<NodeKey, Hash>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore { inner: RwLock::new(BTreeMap::new()) }
    }

    /// Number of entries currently stored. Test/inspection helper, not part
    /// of [`OrderedStore`].
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl OrderedStore for MemoryStore {
    fn first(&self) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        Ok(self.inner.read().iter().next().map(|(k, v)| (*k, *v)))
    }

    fn lookup(&self, key: &NodeKey) -> Result<Option<Hash>, StoreError> {
        Ok(self.inner.read().get(key).copied())
    }

    fn prev(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        let guard = self.inner.read();
        Ok(guard
            .range((Bound::Unbounded, Bound::Excluded(*key)))
            .next_back()
            .map(|(k, v)| (*k, *v)))
    }

    fn next(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        let guard = self.inner.read();
        Ok(guard
            .range((Bound::Excluded(*key), Bound::Unbounded))
            .next()
            .map(|(k, v)| (*k, *v)))
    }

    fn insert(&self, key: NodeKey, value: Hash) -> Result<(), StoreError> {
        self.inner.write().insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &NodeKey) -> Result<(), StoreError> {
        self.inner.write().remove(key);
        Ok(())
    }
}
