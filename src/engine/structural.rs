//! The primitives that recover the tree's topology from sort order alone:
//! closest-or-next lookup, child-hash resolution, split-point creation on
//! insert, and the bottom-up rehash/prune pass. No function here recurses;
//! every walk advances an explicit cursor via `prev`/`next` on the store,
//! per the no-recursion-across-the-store design note.

use std::collections::BTreeSet;

use log::trace;

use crate::error::StoreError;
use crate::hash::{Hash, ZERO_HASH};
use crate::node_key::NodeKey;
use crate::path::{self, Path};
use crate::store::OrderedStore;

/// The store entry with the smallest ordered key `>= (tag, path, len)`.
/// Used to walk into a subtree whose explicit internal node has been
/// collapsed away.
pub fn closest_or_next<S: OrderedStore>(
    store: &S,
    path: Path,
    len: u16,
) -> Result<Option<(NodeKey, Hash)>, StoreError> {
    let target = NodeKey::new(path, len);
    if let Some(hash) = store.lookup(&target)? {
        return Ok(Some((target, hash)));
    }
    store.next(&target)
}

/// The hash of the child subtree rooted at `(parent_path with bit
/// parent_len = dir, parent_len + 1)`. `ZERO_HASH` if that subtree is
/// empty.
pub fn get_child_hash<S: OrderedStore>(
    store: &S,
    parent_path: &Path,
    parent_len: usize,
    dir: u8,
) -> Result<Hash, StoreError> {
    let target = parent_path.child_target(parent_len, dir);
    let child_len = (parent_len + 1) as u16;
    match closest_or_next(store, target, child_len)? {
        Some((found_key, hash)) => {
            if path::prefix_match(&target, &found_key.path, child_len as usize) {
                Ok(hash)
            } else {
                Ok(ZERO_HASH)
            }
        }
        None => Ok(ZERO_HASH),
    }
}

/// On leaf insertion, write a provisional branching node at the LCP of the
/// new leaf with each of its store neighbors. The written hash is often
/// wrong (it only accounts for the two leaves seen here) but that is fine:
/// [`collect_dirty_ancestors`] guarantees every such node is rehashed
/// correctly before the batch concludes. What matters here is that the node
/// *exists* so the rehash sweep visits it.
pub fn ensure_split_points<S: OrderedStore>(
    store: &S,
    leaf_path: &Path,
    leaf_hash: &Hash,
) -> Result<(), StoreError> {
    let leaf_key = NodeKey::new(*leaf_path, 256);
    for neighbor in [store.prev(&leaf_key)?, store.next(&leaf_key)?] {
        let Some((neighbor_key, neighbor_hash)) = neighbor else { continue };
        if neighbor_key.len != 256 {
            continue;
        }
        let (lcp_path, lcp_len) = path::lcp(leaf_path, &neighbor_key.path);
        let split_key = NodeKey::new(lcp_path, lcp_len as u16);
        store.insert(split_key, Hash::node(leaf_hash, &neighbor_hash))?;
    }
    Ok(())
}

/// Walks the `prev`-chain from `(target, len + 1)` toward the root, jumping
/// the cursor by LCP when it steps off `target`'s ancestor chain.
/// Accumulates every ancestor node key it finds into `acc`, in discovery
/// order: leaf-ward ancestor first, root-ward last.
pub fn changes_path_from_lcp<S: OrderedStore>(
    store: &S,
    target: &Path,
    len: usize,
    acc: &mut Vec<NodeKey>,
) -> Result<(), StoreError> {
    let mut cursor = NodeKey::new(*target, (len + 1) as u16);
    loop {
        let Some((found_key, _hash)) = store.prev(&cursor)? else { break };
        if path::prefix_match(target, &found_key.path, found_key.len as usize) {
            acc.push(found_key);
            cursor = found_key;
        } else {
            let (_, lcp_len) = path::lcp(&found_key.path, target);
            let jump_key = NodeKey::new(target.truncated(lcp_len), (lcp_len + 1) as u16);
            cursor = if jump_key < found_key { jump_key } else { found_key };
        }
    }
    Ok(())
}

/// Every ancestor node key whose hash may have changed as a result of the
/// given set of prepared leaf paths.
pub fn collect_dirty_ancestors<S: OrderedStore>(
    store: &S,
    leaf_paths: &[Path],
) -> Result<BTreeSet<NodeKey>, StoreError> {
    let mut acc = BTreeSet::new();
    for p in leaf_paths {
        let mut chain = Vec::new();
        changes_path_from_lcp(store, p, 255, &mut chain)?;
        acc.extend(chain);
    }
    Ok(acc)
}

/// Rehashes (or prunes) every node in `dirty`, deepest (`len` descending)
/// first, so that children are always finalized before their parents are
/// recomputed.
pub fn rehash_and_prune_batch<S: OrderedStore>(
    store: &S,
    dirty: BTreeSet<NodeKey>,
) -> Result<(), StoreError> {
    let mut nodes: Vec<NodeKey> = dirty.into_iter().collect();
    nodes.sort_by(|a, b| b.len.cmp(&a.len));

    for node_key in nodes {
        let left = get_child_hash(store, &node_key.path, node_key.len as usize, 0)?;
        let right = get_child_hash(store, &node_key.path, node_key.len as usize, 1)?;
        if !left.is_zero() && !right.is_zero() {
            trace!("rehashed node at len {}", node_key.len);
            store.insert(node_key, Hash::node(&left, &right))?;
        } else {
            trace!("pruned single-child node at len {}", node_key.len);
            store.delete(&node_key)?;
        }
    }
    Ok(())
}
