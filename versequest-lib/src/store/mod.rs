//! Persistence for per-edition verse embeddings
//!
//! Generating embeddings for a whole edition is the most expensive thing
//! versequest does, so the result is written to a store keyed by edition and
//! read back on the next cold start.
//!
//! # Storage Model
//!
//! Each stored record consists of:
//! - Model: the name of the model that produced the vectors
//! - Dimension: the length of every vector
//! - Vectors: one embedding per verse, in corpus order
//!
//! # Usage
//!
//! ```ignore
//! use versequest_lib::store::{DiskStore, StoredVectors, VectorStore};
//!
//! let store = DiskStore::new("cache");
//! store.write("kjv", &StoredVectors::new("all-MiniLM-L6-v2", vectors))?;
//! let cached = store.read("kjv")?;
//! ```

use serde::{Deserialize, Serialize};

use crate::embed::Embedding;
use crate::Result;

/// An edition's embeddings together with their provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVectors {
    pub model: String,
    pub dimension: usize,
    pub vectors: Vec<Embedding>,
}

impl StoredVectors {
    pub fn new(model: impl Into<String>, vectors: Vec<Embedding>) -> Self {
        let dimension = vectors.first().map_or(0, Vec::len);
        Self {
            model: model.into(),
            dimension,
            vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Whether these vectors can serve `count` verses embedded by `model`.
    pub fn is_fresh(&self, model: &str, dimension: usize, count: usize) -> bool {
        self.model == model
            && self.vectors.len() == count
            && self.vectors.iter().all(|v| v.len() == dimension)
    }
}

/// Trait for vector persistence backends
pub trait VectorStore: Send + Sync {
    /// Read the record stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<StoredVectors>>;

    /// Store `vectors` under `key`, replacing any previous record.
    fn write(&self, key: &str, vectors: &StoredVectors) -> Result<()>;
}

mod disk;
mod memory;

pub use disk::*;
pub use memory::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_from_first_vector() {
        let stored = StoredVectors::new("m", vec![vec![1.0, 0.0, 0.0]]);
        assert_eq!(stored.dimension, 3);
        assert_eq!(StoredVectors::new("m", vec![]).dimension, 0);
    }

    #[test]
    fn test_is_fresh() {
        let stored = StoredVectors::new("m", vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        assert!(stored.is_fresh("m", 2, 2));
        assert!(!stored.is_fresh("m", 2, 3), "count mismatch is stale");
        assert!(!stored.is_fresh("other", 2, 2), "model mismatch is stale");
        assert!(!stored.is_fresh("m", 384, 2), "dimension mismatch is stale");
    }
}
