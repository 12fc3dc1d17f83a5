use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::{StoredVectors, VectorStore};
use crate::{Error, Result};

/// Vector store backed by one bincode file per key: `<dir>/<key>_embeddings.bin`.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}_embeddings.bin"))
    }
}

impl VectorStore for DiskStore {
    fn read(&self, key: &str) -> Result<Option<StoredVectors>> {
        let path = self.path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Store(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        bincode::deserialize(&bytes).map(Some).map_err(|e| {
            Error::Store(format!("failed to deserialize {}: {e}", path.display()))
        })
    }

    fn write(&self, key: &str, vectors: &StoredVectors) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Store(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let bytes = bincode::serialize(vectors)
            .map_err(|e| Error::Store(format!("failed to serialize vectors for '{key}': {e}")))?;

        // write beside the target and rename so readers never see a partial file
        let path = self.path(key);
        let tmp = path.with_extension("bin.tmp");
        std::fs::write(&tmp, bytes)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| Error::Store(format!("failed to write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_naming() {
        let store = DiskStore::new("/cache");
        assert_eq!(store.path("kjv"), PathBuf::from("/cache/kjv_embeddings.bin"));
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        assert!(store.read("kjv").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("nested").join("cache"));
        let stored = StoredVectors::new("m", vec![vec![0.25, -0.5], vec![1.0, 0.0]]);

        store.write("web", &stored).unwrap();

        assert!(store.path("web").exists());
        assert_eq!(store.read("web").unwrap(), Some(stored));
    }

    #[test]
    fn test_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredVectors::new("m", vec![vec![1.0; 8]; 3]);

        DiskStore::new(dir.path()).write("asv", &stored).unwrap();

        let reopened = DiskStore::new(dir.path());
        assert_eq!(reopened.read("asv").unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        std::fs::write(store.path("kjv"), b"\x01\x02").unwrap();

        assert!(matches!(store.read("kjv"), Err(Error::Store(_))));
    }
}
