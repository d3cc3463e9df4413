//! Optional RocksDB-backed [`OrderedStore`], gated behind the `rocksdb`
//! feature. Grounded on the teacher's `database/schema.rs`: `DBConfig` and
//! `CFConfig` there tune an entire multi-column-family database; here there
//! is exactly one column family (the tree has no other data to keep), so
//! the two collapse into a single [`RocksStoreConfig`].
//!
//! RocksDB's default comparator sorts keys byte-lexicographically, which is
//! exactly the order [`NodeKey::encode`] is designed to produce, so no
//! custom comparator is needed.

use std::path::PathBuf;
use std::sync::Arc;

use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};

use super::OrderedStore;
use crate::error::StoreError;
use crate::hash::Hash;
use crate::node_key::NodeKey;

const CF_NODES: &str = "hubt_nodes";

/// Tuning knobs for the on-disk store. Mirrors the handful of
/// `DBConfig`/`CFConfig` fields the teacher actually varies in practice
/// (buffer sizes, open-file limit, block cache); the rest of the teacher's
/// per-column-family options are not meaningful here since there is one CF.
#[derive(Debug, Clone)]
pub struct RocksStoreConfig {
    pub db_path: PathBuf,
    pub write_buffer_size: usize,
    pub max_open_files: i32,
    pub block_cache_size: usize,
}

impl Default for RocksStoreConfig {
    fn default() -> Self {
        RocksStoreConfig {
            db_path: PathBuf::from("./hubt-data"),
            write_buffer_size: 64 * 1024 * 1024,
            max_open_files: 1024,
            block_cache_size: 32 * 1024 * 1024,
        }
    }
}

impl RocksStoreConfig {
    fn to_cf_options(&self) -> Options {
        let mut opts = Options::default();
        opts.set_write_buffer_size(self.write_buffer_size);
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(self.max_open_files);

        let cache = rocksdb::Cache::new_lru_cache(self.block_cache_size);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        opts.set_block_based_table_factory(&block_opts);
        opts
    }
}

pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    pub fn open(config: &RocksStoreConfig) -> Result<Self, StoreError> {
        let cf_opts = config.to_cf_options();
        let cf = ColumnFamilyDescriptor::new(CF_NODES, cf_opts.clone());

        let db = DB::open_cf_descriptors(&cf_opts, &config.db_path, vec![cf])
            .map_err(|e| StoreError::Backend(anyhow::anyhow!(e)))?;

        Ok(RocksStore { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(CF_NODES)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("missing column family {CF_NODES}")))
    }

    fn decode_entry(key: &[u8], value: &[u8]) -> Result<(NodeKey, Hash), StoreError> {
        let node_key = NodeKey::decode(key)?;
        if value.len() != 32 {
            return Err(StoreError::MalformedKey(format!(
                "expected 32-byte hash, got {} bytes",
                value.len()
            )));
        }
        let mut hash_bytes = [0u8; 32];
        hash_bytes.copy_from_slice(value);
        Ok((node_key, Hash::from(hash_bytes)))
    }
}

impl OrderedStore for RocksStore {
    fn first(&self) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        let cf = self.cf()?;
        let mut iter = self.db.iterator_cf(cf, IteratorMode::Start);
        match iter.next() {
            Some(Ok((k, v))) => Ok(Some(Self::decode_entry(&k, &v)?)),
            Some(Err(e)) => Err(StoreError::Backend(anyhow::anyhow!(e))),
            None => Ok(None),
        }
    }

    fn lookup(&self, key: &NodeKey) -> Result<Option<Hash>, StoreError> {
        let cf = self.cf()?;
        let encoded = key.encode();
        match self.db.get_cf(cf, encoded) {
            Ok(Some(bytes)) => {
                if bytes.len() != 32 {
                    return Err(StoreError::MalformedKey(format!(
                        "expected 32-byte hash, got {} bytes",
                        bytes.len()
                    )));
                }
                let mut hash_bytes = [0u8; 32];
                hash_bytes.copy_from_slice(&bytes);
                Ok(Some(Hash::from(hash_bytes)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(anyhow::anyhow!(e))),
        }
    }

    fn prev(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        let cf = self.cf()?;
        let encoded = key.encode();
        let mut iter = self.db.iterator_cf(
            cf,
            IteratorMode::From(&encoded, Direction::Reverse),
        );
        match iter.next() {
            Some(Ok((k, v))) => {
                if k.as_ref() == encoded {
                    match iter.next() {
                        Some(Ok((k2, v2))) => Ok(Some(Self::decode_entry(&k2, &v2)?)),
                        Some(Err(e)) => Err(StoreError::Backend(anyhow::anyhow!(e))),
                        None => Ok(None),
                    }
                } else {
                    Ok(Some(Self::decode_entry(&k, &v)?))
                }
            }
            Some(Err(e)) => Err(StoreError::Backend(anyhow::anyhow!(e))),
            None => Ok(None),
        }
    }

    fn next(&self, key: &NodeKey) -> Result<Option<(NodeKey, Hash)>, StoreError> {
        let cf = self.cf()?;
        let encoded = key.encode();
        let mut iter = self.db.iterator_cf(
            cf,
            IteratorMode::From(&encoded, Direction::Forward),
        );
        match iter.next() {
            Some(Ok((k, v))) => {
                if k.as_ref() == encoded {
                    match iter.next() {
                        Some(Ok((k2, v2))) => Ok(Some(Self::decode_entry(&k2, &v2)?)),
                        Some(Err(e)) => Err(StoreError::Backend(anyhow::anyhow!(e))),
                        None => Ok(None),
                    }
                } else {
                    Ok(Some(Self::decode_entry(&k, &v)?))
                }
            }
            Some(Err(e)) => Err(StoreError::Backend(anyhow::anyhow!(e))),
            None => Ok(None),
        }
    }

    fn insert(&self, key: NodeKey, value: Hash) -> Result<(), StoreError> {
        let cf = self.cf()?;
        self.db
            .put_cf(cf, key.encode(), value.as_bytes())
            .map_err(|e| StoreError::Backend(anyhow::anyhow!(e)))
    }

    fn delete(&self, key: &NodeKey) -> Result<(), StoreError> {
        let cf = self.cf()?;
        self.db
            .delete_cf(cf, key.encode())
            .map_err(|e| StoreError::Backend(anyhow::anyhow!(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use tempfile::tempdir;

    fn open_test_store() -> (RocksStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = RocksStoreConfig { db_path: dir.path().to_path_buf(), ..Default::default() };
        (RocksStore::open(&config).unwrap(), dir)
    }

    #[test]
    fn insert_then_lookup_round_trips() {
        let (store, _dir) = open_test_store();
        let key = NodeKey::new(Path::from_key(b"k"), 3);
        let value = Hash::of(b"v");
        store.insert(key, value).unwrap();
        assert_eq!(store.lookup(&key).unwrap(), Some(value));
    }

    #[test]
    fn prev_next_skip_the_key_itself() {
        let (store, _dir) = open_test_store();
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        let a = NodeKey::new(Path::from_bytes(bytes), 0);
        bytes[0] = 2;
        let b = NodeKey::new(Path::from_bytes(bytes), 0);
        bytes[0] = 3;
        let c = NodeKey::new(Path::from_bytes(bytes), 0);

        store.insert(a, Hash::of(b"a")).unwrap();
        store.insert(b, Hash::of(b"b")).unwrap();
        store.insert(c, Hash::of(b"c")).unwrap();

        assert_eq!(store.prev(&b).unwrap().unwrap().0, a);
        assert_eq!(store.next(&b).unwrap().unwrap().0, c);
    }

    #[test]
    fn delete_removes_entry() {
        let (store, _dir) = open_test_store();
        let key = NodeKey::new(Path::from_key(b"k"), 0);
        store.insert(key, Hash::of(b"v")).unwrap();
        store.delete(&key).unwrap();
        assert_eq!(store.lookup(&key).unwrap(), None);
    }
}
