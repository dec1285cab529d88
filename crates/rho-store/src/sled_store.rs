use std::path::{Path, PathBuf};

use crate::{Batch, KvStore, StoreError};

/// A `sled`-backed store, opened create-if-missing/error-if-exists and
/// destroyed on [`SledStore::destroy`] (`spec.md` §6, §4.4).
///
/// `sled` has no built-in "error if exists" open mode (unlike the LevelDB
/// this search was originally built against), so exclusivity is enforced
/// here with a path-existence check before `sled::open`. This is a
/// check-then-act race in theory; in practice the store path is unique per
/// process (`--db-path`, see `SPEC_FULL.md` §C), so no other process is
/// ever racing to create the same path.
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledStore {
    pub fn open_exclusive(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(StoreError::AlreadyExists { path });
        }
        let db = sled::open(&path).map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self { db, path })
    }

    /// Closes the store and removes its on-disk directory (`spec.md` §1
    /// "the KV store is created exclusive and destroyed on exit").
    pub fn destroy(self) -> Result<(), StoreError> {
        let path = self.path.clone();
        drop(self.db);
        std::fs::remove_dir_all(&path).map_err(|e| StoreError::Destroy(e.to_string()))
    }
}

impl KvStore for SledStore {
    fn apply_batch(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut sled_batch = sled::Batch::default();
        for (key, value) in batch.into_writes() {
            sled_batch.insert(key, value);
        }
        self.db
            .apply_batch(sled_batch)
            .map_err(|e| StoreError::Write(e.to_string()))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get(key)
            .map(|found| found.map(|ivec| ivec.to_vec()))
            .map_err(|e| StoreError::Read(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_create_and_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store");
        let store = SledStore::open_exclusive(&path).unwrap();

        assert_eq!(store.get(b"image").unwrap(), None);

        let mut batch = Batch::new();
        batch.insert(b"image", b"preimage");
        store.apply_batch(batch).unwrap();

        assert_eq!(store.get(b"image").unwrap(), Some(b"preimage".to_vec()));
    }

    #[test]
    fn refuses_to_reopen_an_existing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store");
        let _first = SledStore::open_exclusive(&path).unwrap();

        match SledStore::open_exclusive(&path) {
            Err(StoreError::AlreadyExists { path: got }) => assert_eq!(got, path),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn destroy_removes_the_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store");
        let store = SledStore::open_exclusive(&path).unwrap();
        store.destroy().unwrap();
        assert!(!path.exists());
    }
}
