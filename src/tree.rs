//! The public handle. Generalizes the teacher's `CanonicalSMT` shape
//! (a struct wrapping a database handle) to an explicit generic handle over
//! any [`OrderedStore`], per the design note that re-architects a
//! process-wide mutable table as a value that can be constructed, passed
//! around, and substituted in tests.

use log::debug;

use crate::engine::batch::{self, Op};
use crate::engine::proof::{self, Proof};
use crate::engine::verify;
use crate::error::{ProveError, StoreError};
use crate::hash::{Hash, ZERO_HASH};
use crate::store::OrderedStore;

/// A Hot Unified Binary Tree over a backing `S: OrderedStore`.
///
/// `Tree` carries no state of its own beyond the store handle: every
/// operation is a pure function of the store's current contents.
pub struct Tree<S> {
    store: S,
}

impl<S: OrderedStore> Tree<S> {
    /// Wraps an existing store. The store may already contain entries (for
    /// instance, reopening a RocksDB-backed tree), or be empty.
    pub fn init(store: S) -> Self {
        Tree { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The current commitment: the stored hash of the smallest-ordered
    /// node, or `ZERO_HASH` if the store is empty.
    pub fn root(&self) -> Result<Hash, StoreError> {
        match self.store.first()? {
            Some((_, hash)) => Ok(hash),
            None => Ok(ZERO_HASH),
        }
    }

    /// Applies a batch of insert/delete operations, rehashing and pruning
    /// the affected ancestors, and returns the new root.
    pub fn batch_update(&self, ops: Vec<Op>) -> Result<Hash, ProveError> {
        debug!("applying batch of {} op(s)", ops.len());
        batch::batch_update(&self.store, ops)?;
        let root = self.root()?;
        debug!("batch applied, new root = {root}");
        Ok(root)
    }

    /// Inclusion proof for `(k, v)`.
    pub fn prove(&self, k: &[u8], v: &[u8]) -> Result<Proof, ProveError> {
        let root = self.root()?;
        proof::prove(&self.store, root, k, v)
    }

    /// Exclusion proof for `k`.
    pub fn prove_non_existence(&self, k: &[u8]) -> Result<Proof, ProveError> {
        let root = self.root()?;
        proof::prove_non_existence(&self.store, root, k)
    }

    /// Mismatch proof for `(k, v_claimed)`.
    pub fn prove_mismatch(&self, k: &[u8], v_claimed: &[u8]) -> Result<Proof, ProveError> {
        let root = self.root()?;
        proof::prove_mismatch(&self.store, root, k, v_claimed)
    }
}

/// Checks an inclusion proof. Does not touch any store.
pub fn verify(k: &[u8], v: &[u8], proof: &Proof) -> bool {
    verify::verify(k, v, proof)
}

/// Checks an exclusion proof. Does not touch any store.
pub fn verify_non_existence(k: &[u8], proof: &Proof) -> bool {
    verify::verify_non_existence(k, proof)
}

/// Checks a mismatch proof. Does not touch any store.
pub fn verify_mismatch(k: &[u8], v_claimed: &[u8], proof: &Proof) -> bool {
    verify::verify_mismatch(k, v_claimed, proof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tree() -> Tree<MemoryStore> {
        Tree::init(MemoryStore::new())
    }

    #[test]
    fn empty_tree_root_is_zero() {
        let t = tree();
        assert_eq!(t.root().unwrap(), ZERO_HASH);
    }

    #[test]
    fn single_insert_root_is_leaf_hash() {
        let t = tree();
        let k = b"a".repeat(32);
        let v = b"A".repeat(32);
        let root = t.batch_update(vec![Op::Insert(k.clone(), v.clone())]).unwrap();
        assert_eq!(root, Hash::leaf(&k, &v));
    }

    #[test]
    fn insert_then_delete_returns_to_zero_root() {
        let t = tree();
        let k = b"a".repeat(32);
        t.batch_update(vec![Op::Insert(k.clone(), b"A".repeat(32))]).unwrap();
        let root = t.batch_update(vec![Op::Delete(k)]).unwrap();
        assert_eq!(root, ZERO_HASH);
    }

    #[test]
    fn full_prove_and_verify_round_trip() {
        let t = tree();
        let k = b"a".repeat(32);
        let v = b"A".repeat(32);
        t.batch_update(vec![Op::Insert(k.clone(), v.clone())]).unwrap();

        let inclusion = t.prove(&k, &v).unwrap();
        assert!(verify(&k, &v, &inclusion));

        let absent_key = b"z".repeat(32);
        let exclusion = t.prove_non_existence(&absent_key).unwrap();
        assert!(verify_non_existence(&absent_key, &exclusion));

        let mismatch = t.prove_mismatch(&k, &b"B".repeat(32)).unwrap();
        assert!(verify_mismatch(&k, &b"B".repeat(32), &mismatch));
    }
}
