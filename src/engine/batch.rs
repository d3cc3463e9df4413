//! Batch update: the only way the tree's committed state changes. Accepts a
//! list of insert/delete operations, normalizes them to leaf form, applies
//! the leaf changes, then delegates structural repair.

use log::debug;

use crate::engine::structural;
use crate::error::StoreError;
use crate::hash::Hash;
use crate::node_key::NodeKey;
use crate::path::Path;
use crate::store::OrderedStore;

/// A single requested change: insert a key-value pair, or delete a key.
/// Raw keys and values are arbitrary byte strings; the canonical
/// application uses 32 bytes for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

enum Prepared {
    Insert { path: Path, leaf_hash: Hash },
    Delete { path: Path },
}

impl Prepared {
    fn path(&self) -> Path {
        match self {
            Prepared::Insert { path, .. } | Prepared::Delete { path } => *path,
        }
    }

    fn is_insert(&self) -> bool {
        matches!(self, Prepared::Insert { .. })
    }
}

/// Runs a batch of [`Op`]s to completion: leaf mutation, split-point
/// creation, and bottom-up rehash/prune, leaving the store in a state that
/// satisfies I1-I6.
pub fn batch_update<S: OrderedStore>(store: &S, ops: Vec<Op>) -> Result<(), StoreError> {
    let mut prepared: Vec<Prepared> = ops
        .into_iter()
        .map(|op| match op {
            Op::Insert(k, v) => {
                let path = Path::from_key(&k);
                let leaf_hash = Hash::leaf(&k, &v);
                Prepared::Insert { path, leaf_hash }
            }
            Op::Delete(k) => Prepared::Delete { path: Path::from_key(&k) },
        })
        .collect();

    // Sort by path ascending; on a tie (duplicate key within one batch),
    // deletes sort first so a Delete-then-Insert of the same key within one
    // batch ends up inserted.
    prepared.sort_by(|a, b| a.path().cmp(&b.path()).then_with(|| a.is_insert().cmp(&b.is_insert())));

    for p in &prepared {
        if let Prepared::Delete { path } = p {
            store.delete(&NodeKey::new(*path, 256))?;
        }
    }

    for p in &prepared {
        if let Prepared::Insert { path, leaf_hash } = p {
            store.insert(NodeKey::new(*path, 256), *leaf_hash)?;
        }
    }

    for p in &prepared {
        if let Prepared::Insert { path, leaf_hash } = p {
            structural::ensure_split_points(store, path, leaf_hash)?;
        }
    }

    let paths: Vec<Path> = prepared.iter().map(|p| p.path()).collect();
    let dirty = structural::collect_dirty_ancestors(store, &paths)?;
    debug!("rehashing/pruning {} dirty ancestor node(s)", dirty.len());
    structural::rehash_and_prune_batch(store, dirty)?;

    #[cfg(debug_assertions)]
    debug_assert_invariants(store)?;

    Ok(())
}

/// Debug-only sweep asserting I2 (sparse branching) and I3 (hash
/// consistency) across every node currently in the store. Skipped in
/// release builds; a batch that violates these would already have produced
/// a wrong root, so this exists purely to catch it close to the source.
#[cfg(debug_assertions)]
fn debug_assert_invariants<S: OrderedStore>(store: &S) -> Result<(), StoreError> {
    let mut cursor = match store.first()? {
        Some(entry) => entry,
        None => return Ok(()),
    };
    loop {
        let (key, hash) = cursor;
        if key.len < 256 {
            let left = structural::get_child_hash(store, &key.path, key.len as usize, 0)?;
            let right = structural::get_child_hash(store, &key.path, key.len as usize, 1)?;
            debug_assert!(!left.is_zero() && !right.is_zero(), "I2 violated: single-child internal node at len {}", key.len);
            debug_assert_eq!(hash, Hash::node(&left, &right), "I3 violated at len {}", key.len);
        }
        match store.next(&key)? {
            Some(next_entry) => cursor = next_entry,
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn single_insert_leaf_is_only_entry() {
        let store = MemoryStore::new();
        batch_update(&store, vec![Op::Insert(b"a".repeat(32), b"A".repeat(32))]).unwrap();

        let path = Path::from_key(&b"a".repeat(32));
        let leaf_hash = Hash::leaf(&b"a".repeat(32), &b"A".repeat(32));
        assert_eq!(store.lookup(&NodeKey::new(path, 256)).unwrap(), Some(leaf_hash));
    }

    #[test]
    fn insert_then_delete_empties_the_store() {
        let store = MemoryStore::new();
        let key = b"a".repeat(32);
        batch_update(&store, vec![Op::Insert(key.clone(), b"A".repeat(32))]).unwrap();
        batch_update(&store, vec![Op::Delete(key)]).unwrap();
        assert_eq!(store.first().unwrap(), None);
    }

    #[test]
    fn reinserting_existing_key_overwrites_leaf() {
        let store = MemoryStore::new();
        let key = b"a".repeat(32);
        batch_update(&store, vec![Op::Insert(key.clone(), b"A".repeat(32))]).unwrap();
        batch_update(&store, vec![Op::Insert(key.clone(), b"B".repeat(32))]).unwrap();

        let path = Path::from_key(&key);
        let expected = Hash::leaf(&key, &b"B".repeat(32));
        assert_eq!(store.lookup(&NodeKey::new(path, 256)).unwrap(), Some(expected));
    }

    #[test]
    fn deleting_absent_key_is_a_harmless_no_op() {
        let store = MemoryStore::new();
        batch_update(&store, vec![Op::Delete(b"nope".repeat(8))]).unwrap();
        assert_eq!(store.first().unwrap(), None);
    }
}
