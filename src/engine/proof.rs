//! The three proof constructors: inclusion, exclusion (non-existence), and
//! mismatch. Every prover reads the store and nothing else; verification
//! (in [`crate::engine::verify`]) never touches it.

use crate::engine::structural;
use crate::error::ProveError;
use crate::hash::Hash;
use crate::node_key::NodeKey;
use crate::path::{self, Path};
use crate::store::OrderedStore;

/// Which side of a join the *sibling* hash sits on. `Left` means the
/// sibling is prepended to the accumulator (`H(sibling ‖ acc)`); `Right`
/// means it's appended (`H(acc ‖ sibling)`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left = 0,
    Right = 1,
}

impl Direction {
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A single sibling hash on the path from a leaf to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofNode {
    pub hash: Hash,
    pub direction: Direction,
    pub len: u16,
}

/// The three statements the tree can prove about a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proof {
    Inclusion { root: Hash, nodes: Vec<ProofNode> },
    /// `proven_path`/`proven_hash` are `None` exactly when the tree was
    /// empty at proof time (`root == ZERO_HASH`); otherwise both are
    /// present and name the neighbor leaf the absence is anchored to.
    NonExistence { root: Hash, proven_path: Option<Path>, proven_hash: Option<Hash>, nodes: Vec<ProofNode> },
    Mismatch { root: Hash, actual_hash: Hash, claimed_hash: Hash, nodes: Vec<ProofNode> },
}

/// Collects the ancestor chain of `(path, len)` as proof nodes, leaf-ward
/// first, in the order `calculate_root` expects to fold them.
pub fn generate_proof_nodes<S: OrderedStore>(
    store: &S,
    path: &Path,
    len: u16,
) -> Result<Vec<ProofNode>, crate::error::StoreError> {
    let mut ancestors = Vec::new();
    if len > 0 {
        structural::changes_path_from_lcp(store, path, (len - 1) as usize, &mut ancestors)?;
    }

    let mut nodes = Vec::with_capacity(ancestors.len());
    for ancestor in ancestors {
        let my_dir = path.bit(ancestor.len as usize);
        let sibling_dir = 1 - my_dir;
        let sibling_hash =
            structural::get_child_hash(store, &ancestor.path, ancestor.len as usize, sibling_dir)?;
        nodes.push(ProofNode { hash: sibling_hash, direction: Direction::from_bit(sibling_dir), len: ancestor.len });
    }
    Ok(nodes)
}

/// Inclusion proof for `(k, v)`.
pub fn prove<S: OrderedStore>(store: &S, root: Hash, k: &[u8], v: &[u8]) -> Result<Proof, ProveError> {
    let path = Path::from_key(k);
    let leaf = Hash::leaf(k, v);
    let leaf_key = NodeKey::new(path, 256);
    match store.lookup(&leaf_key)? {
        Some(stored) if stored == leaf => {
            let nodes = generate_proof_nodes(store, &path, 256)?;
            Ok(Proof::Inclusion { root, nodes })
        }
        _ => Err(ProveError::NotFound),
    }
}

/// Exclusion proof for `k`.
pub fn prove_non_existence<S: OrderedStore>(store: &S, root: Hash, k: &[u8]) -> Result<Proof, ProveError> {
    let target = Path::from_key(k);

    let first = store.first()?;
    let Some(_) = first else {
        return Ok(Proof::NonExistence { root, proven_path: None, proven_hash: None, nodes: Vec::new() });
    };

    let target_key = NodeKey::new(target, 256);
    // `prev`/`next` exclude an exact match at `target_key`, so a present
    // key has to be screened separately with a direct lookup.
    if store.lookup(&target_key)?.is_some() {
        return Err(ProveError::KeyExists);
    }
    let prev = store.prev(&target_key)?;
    let next = store.next(&target_key)?;

    let score = |candidate: &Option<(NodeKey, Hash)>| -> Option<usize> {
        candidate.as_ref().map(|(key, _)| {
            let lcp_len = path::divergence_index(&target, &key.path);
            lcp_len.min(key.len as usize)
        })
    };

    let prev_score = score(&prev);
    let next_score = score(&next);

    let winner = match (prev_score, next_score) {
        (None, None) => unreachable!("store is non-empty but neither prev nor next found an entry"),
        (Some(_), None) => prev.unwrap(),
        (None, Some(_)) => next.unwrap(),
        (Some(ps), Some(ns)) => {
            if ps >= ns {
                prev.unwrap()
            } else {
                next.unwrap()
            }
        }
    };

    let (winner_key, winner_hash) = winner;
    if winner_key.len == 256 && winner_key.path == target {
        return Err(ProveError::KeyExists);
    }

    let nodes = generate_proof_nodes(store, &winner_key.path, winner_key.len)?;
    Ok(Proof::NonExistence {
        root,
        proven_path: Some(winner_key.path),
        proven_hash: Some(winner_hash),
        nodes,
    })
}

/// Mismatch proof for `(k, v_claimed)`.
pub fn prove_mismatch<S: OrderedStore>(
    store: &S,
    root: Hash,
    k: &[u8],
    v_claimed: &[u8],
) -> Result<Proof, ProveError> {
    let path = Path::from_key(k);
    let claimed = Hash::leaf(k, v_claimed);
    let leaf_key = NodeKey::new(path, 256);

    let actual = store.lookup(&leaf_key)?.ok_or(ProveError::KeyNotFound)?;
    if actual == claimed {
        return Err(ProveError::ValueMatches);
    }

    let nodes = generate_proof_nodes(store, &path, 256)?;
    Ok(Proof::Mismatch { root, actual_hash: actual, claimed_hash: claimed, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::batch::{batch_update, Op};
    use crate::store::MemoryStore;

    fn setup_two_leaves() -> (MemoryStore, Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
        let store = MemoryStore::new();
        let k0 = b"k0".repeat(16);
        let v0 = b"v0".repeat(16);
        let k1 = b"k1".repeat(16);
        let v1 = b"v1".repeat(16);
        batch_update(
            &store,
            vec![Op::Insert(k0.clone(), v0.clone()), Op::Insert(k1.clone(), v1.clone())],
        )
        .unwrap();
        (store, k0, v0, k1, v1)
    }

    fn current_root(store: &MemoryStore) -> Hash {
        store.first().unwrap().map(|(_, h)| h).unwrap_or(crate::hash::ZERO_HASH)
    }

    #[test]
    fn inclusion_proof_found_for_existing_key() {
        let (store, k0, v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let proof = prove(&store, root, &k0, &v0).unwrap();
        assert!(matches!(proof, Proof::Inclusion { .. }));
    }

    #[test]
    fn inclusion_proof_missing_for_absent_key() {
        let (store, _k0, _v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let err = prove(&store, root, &b"nope".repeat(8), &b"nope".repeat(8)).unwrap_err();
        assert_eq!(err, ProveError::NotFound);
    }

    #[test]
    fn non_existence_on_empty_tree_has_no_nodes() {
        let store = MemoryStore::new();
        let proof = prove_non_existence(&store, crate::hash::ZERO_HASH, &b"anything".repeat(4)).unwrap();
        match proof {
            Proof::NonExistence { proven_path, proven_hash, nodes, .. } => {
                assert_eq!(proven_path, None);
                assert_eq!(proven_hash, None);
                assert!(nodes.is_empty());
            }
            _ => panic!("expected NonExistence"),
        }
    }

    #[test]
    fn non_existence_rejects_present_key() {
        let (store, k0, _v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let err = prove_non_existence(&store, root, &k0).unwrap_err();
        assert_eq!(err, ProveError::KeyExists);
    }

    #[test]
    fn mismatch_rejects_absent_key() {
        let (store, _k0, _v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let err = prove_mismatch(&store, root, &b"absent".repeat(6), &b"x".repeat(32)).unwrap_err();
        assert_eq!(err, ProveError::KeyNotFound);
    }

    #[test]
    fn mismatch_rejects_matching_value() {
        let (store, k0, v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let err = prove_mismatch(&store, root, &k0, &v0).unwrap_err();
        assert_eq!(err, ProveError::ValueMatches);
    }

    #[test]
    fn mismatch_succeeds_for_wrong_value() {
        let (store, k0, _v0, _k1, _v1) = setup_two_leaves();
        let root = current_root(&store);
        let proof = prove_mismatch(&store, root, &k0, &b"wrong".repeat(7)).unwrap();
        assert!(matches!(proof, Proof::Mismatch { .. }));
    }
}
