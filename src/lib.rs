//! HUBT, the Hot Unified Binary Tree.
//!
//! An authenticated key-value index that maintains a 256-bit root hash over
//! a set of key-value pairs without storing its own topology: internal
//! structure is derived on demand from the sort order of an ordered
//! key-value backing store (see [`store::OrderedStore`]). The tree can
//! produce three kinds of compact proof: that a pair is present
//! ([`engine::proof::Proof::Inclusion`]), that a key is absent
//! ([`engine::proof::Proof::NonExistence`]), and that a key is present with
//! a different value than claimed ([`engine::proof::Proof::Mismatch`]).
//!
//! ```
//! use hubt::{Tree, MemoryStore, Op, verify};
//!
//! let tree = Tree::init(MemoryStore::new());
//! let (k, v) = (b"key".repeat(11), b"val".repeat(11));
//! tree.batch_update(vec![Op::Insert(k.clone(), v.clone())]).unwrap();
//!
//! let proof = tree.prove(&k, &v).unwrap();
//! assert!(verify(&k, &v, &proof));
//! ```

pub mod engine;
pub mod error;
pub mod hash;
pub mod node_key;
pub mod path;
pub mod store;
pub mod tree;

pub use engine::{Direction, Op, Proof, ProofNode};
pub use error::{ProveError, StoreError};
pub use hash::{Hash, ZERO_HASH};
pub use node_key::{NodeKey, NodeTag};
pub use path::Path;
pub use store::{MemoryStore, OrderedStore};
#[cfg(feature = "rocksdb")]
pub use store::{RocksStore, RocksStoreConfig};
pub use tree::{verify, verify_mismatch, verify_non_existence, Tree};
