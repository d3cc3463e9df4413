//! The store's sort key: `(tag, path, len)`, compared lexicographically as
//! path-then-len so that a scan over the store visits nodes in the same
//! order the tree's bit-paths would.

use crate::error::StoreError;
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Every entry the store holds is a tree node; the tag exists so the key
/// encoding has a stable discriminant byte if other key kinds are ever
/// added to the same store.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeTag {
    Node = 0x01,
}

/// `(tag, path, len)`. `Ord` is derived in field order, so two keys with the
/// same tag sort by `path` first and `len` second, exactly the
/// "path-then-len" lexicographic order required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub tag: NodeTag,
    pub path: Path,
    pub len: u16,
}

/// `tag_byte ‖ path[0..32] ‖ len_be_u16`.
pub const ENCODED_LEN: usize = 1 + 32 + 2;

impl NodeKey {
    pub fn new(path: Path, len: u16) -> Self {
        NodeKey { tag: NodeTag::Node, path, len }
    }

    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out[0] = self.tag as u8;
        out[1..33].copy_from_slice(self.path.as_bytes());
        out[33..35].copy_from_slice(&self.len.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() != ENCODED_LEN {
            return Err(StoreError::MalformedKey(format!(
                "expected {} bytes, got {}",
                ENCODED_LEN,
                bytes.len()
            )));
        }
        let tag = match bytes[0] {
            0x01 => NodeTag::Node,
            other => {
                return Err(StoreError::MalformedKey(format!("unknown tag byte {other:#04x}")))
            }
        };
        let mut path_bytes = [0u8; 32];
        path_bytes.copy_from_slice(&bytes[1..33]);
        let len = u16::from_be_bytes([bytes[33], bytes[34]]);
        Ok(NodeKey { tag, path: Path::from_bytes(path_bytes), len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trips() {
        let key = NodeKey::new(Path::from_key(b"k"), 17);
        let encoded = key.encode();
        assert_eq!(NodeKey::decode(&encoded).unwrap(), key);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(NodeKey::decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let mut encoded = NodeKey::new(Path::zero(), 0).encode();
        encoded[0] = 0xFF;
        assert!(NodeKey::decode(&encoded).is_err());
    }

    #[test]
    fn ordering_is_path_then_len() {
        let p1 = Path::from_bytes({
            let mut b = [0u8; 32];
            b[0] = 0x01;
            b
        });
        let p2 = Path::from_bytes({
            let mut b = [0u8; 32];
            b[0] = 0x02;
            b
        });
        let a = NodeKey::new(p1, 100);
        let b = NodeKey::new(p2, 1);
        assert!(a < b);

        let c = NodeKey::new(p1, 1);
        let d = NodeKey::new(p1, 2);
        assert!(c < d);
    }
}
