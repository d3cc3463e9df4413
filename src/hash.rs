//! The 32-byte commitment primitive.
//!
//! Every leaf and every internal node in the tree stores exactly one
//! [`Hash`]. Leaves store `H(k ‖ v)`; internal nodes store `H(left ‖ right)`
//! where `left`/`right` are the direct child hashes. [`ZERO_HASH`] is the
//! sentinel for an absent/empty subtree and the root of an empty tree.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

/// Sentinel for "absent/empty subtree" and the root of an empty tree (I4).
pub const ZERO_HASH: Hash = Hash([0u8; 32]);

impl Hash {
    pub const fn zero() -> Self {
        ZERO_HASH
    }

    pub fn is_zero(&self) -> bool {
        *self == ZERO_HASH
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `H(k ‖ v)`, the stored value of a leaf (I1).
    pub fn leaf(key: &[u8], value: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.update(value);
        Hash(hasher.finalize().into())
    }

    /// `H(left ‖ right)`, the stored value of an internal node (I3).
    pub fn node(left: &Hash, right: &Hash) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(left.0);
        hasher.update(right.0);
        Hash(hasher.finalize().into())
    }

    /// `H(bytes)`, used to turn a raw key into a [`crate::path::Path`].
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Hash(hasher.finalize().into())
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hash_is_all_zero_bytes() {
        assert_eq!(ZERO_HASH.0, [0u8; 32]);
        assert!(ZERO_HASH.is_zero());
    }

    #[test]
    fn leaf_hash_is_deterministic_and_order_sensitive() {
        let a = Hash::leaf(b"key", b"value");
        let b = Hash::leaf(b"key", b"value");
        assert_eq!(a, b);

        let c = Hash::leaf(b"value", b"key");
        assert_ne!(a, c);
    }

    #[test]
    fn node_hash_is_order_sensitive() {
        let l = Hash::of(b"left");
        let r = Hash::of(b"right");
        assert_ne!(Hash::node(&l, &r), Hash::node(&r, &l));
    }
}
