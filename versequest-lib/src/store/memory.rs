use std::collections::HashMap;

use parking_lot::RwLock;

use crate::store::{StoredVectors, VectorStore};
use crate::Result;

/// In-memory vector store for development and testing.
///
/// Nothing survives the process, so every cold start regenerates embeddings.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredVectors>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VectorStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<StoredVectors>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn write(&self, key: &str, vectors: &StoredVectors) -> Result<()> {
        self.records.write().insert(key.to_string(), vectors.clone());
        Ok(())
    }
}
