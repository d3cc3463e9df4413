//! The ordered key-value abstraction the tree is built over.
//!
//! The structural engine never assumes a particular backend: everything it
//! needs is `first`, `lookup`, `prev`, `next`, `insert`, `delete` over
//! [`NodeKey`]-sorted entries. This mirrors the teacher's `DatabaseManager`
//! CRUD surface in `database/schema.rs`, generalized from a fixed set of
//! column families to a single generic ordered map, and the `Storage` trait
//! abstraction used by the reference radix-tree implementation.

mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

pub use memory::MemoryStore;
#[cfg(feature = "rocksdb")]
pub use rocks::{RocksStore, RocksStoreConfig};

use crate::error::StoreError;
use crate::hash::Hash;
use crate::node_key::NodeKey;

/// A byte-lexicographically ordered map from [`NodeKey`] to [`Hash`].
///
/// Implementations are not required to be transactional across multiple
/// calls; the engine calls these one at a time and does its own batching at
/// a higher level.
pub trait OrderedStore {
    /// The smallest key in the store, if any.
    fn first(&self) -> Result<Option<(NodeKey, Hash)>, StoreError>;

    /// The value stored at `key`, if present.
    fn lookup(&self, key: &NodeKey) -> Result<Option<Hash>, StoreError>;

    /// The largest key strictly less than `key`, if any.
    fn prev(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError>;

    /// The smallest key strictly greater than `key`, if any.
    fn next(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError>;

    /// Insert or overwrite the value at `key`.
    fn insert(&self, key: NodeKey, value: Hash) -> Result<(), StoreError>;

    /// Remove `key`, if present.
    fn delete(&self, key: &NodeKey) -> Result<(), StoreError>;
}
