//! Stateless proof verification. None of these functions touch the store;
//! they are total over their inputs and never panic; a malformed or
//! forged proof simply fails to verify.

use crate::engine::proof::{Direction, Proof, ProofNode};
use crate::hash::{Hash, ZERO_HASH};
use crate::path::{self, Path};

/// Folds `nodes` onto `leaf`, reconstructing the root a genuine proof would
/// have been built against.
pub fn calculate_root(leaf: Hash, nodes: &[ProofNode]) -> Hash {
    let mut acc = leaf;
    for node in nodes {
        acc = match node.direction {
            Direction::Left => Hash::node(&node.hash, &acc),
            Direction::Right => Hash::node(&acc, &node.hash),
        };
    }
    acc
}

/// Checks an inclusion proof for `(k, v)`.
pub fn verify(k: &[u8], v: &[u8], proof: &Proof) -> bool {
    match proof {
        Proof::Inclusion { root, nodes } => calculate_root(Hash::leaf(k, v), nodes) == *root,
        _ => false,
    }
}

/// Checks an exclusion proof for `k`.
pub fn verify_non_existence(k: &[u8], proof: &Proof) -> bool {
    let Proof::NonExistence { root, proven_path, proven_hash, nodes } = proof else {
        return false;
    };

    if *root == ZERO_HASH {
        return proven_path.is_none() && proven_hash.is_none() && nodes.is_empty();
    }

    let (Some(proven_path), Some(proven_hash)) = (proven_path, proven_hash) else {
        return false;
    };

    let target = Path::from_key(k);

    if calculate_root(*proven_hash, nodes) != *root {
        return false;
    }
    if *proven_path == target {
        return false;
    }

    let divergence = path::divergence_index(proven_path, &target);
    // Ambiguity check: a sibling at exactly the divergence depth would mean
    // target's path could continue into a populated subtree.
    !nodes.iter().any(|node| node.len as usize == divergence)
}

/// Checks a mismatch proof for `(k, v_claimed)`.
pub fn verify_mismatch(k: &[u8], v_claimed: &[u8], proof: &Proof) -> bool {
    let Proof::Mismatch { root, actual_hash, nodes, .. } = proof else {
        return false;
    };
    let claimed = Hash::leaf(k, v_claimed);
    *actual_hash != claimed && calculate_root(*actual_hash, nodes) == *root
}
