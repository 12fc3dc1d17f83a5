//! Text embedding using local models
//!
//! Uses sentence-embedding models via the fastembed crate (ONNX runtime).
//! The default is all-MiniLM-L6-v2 (384 dimensions).
//!
//! Corpus vectors and query vectors are only comparable when they come from
//! the same model, so [`EmbeddingCache`] tags persisted vectors with the
//! model name and regenerates them when the model changes.
//!
//! # Usage
//!
//! ```ignore
//! use versequest_lib::embed::{Embedder, LocalEmbedder, ModelKind};
//!
//! let mut embedder = LocalEmbedder::new(ModelKind::default(), None);
//!
//! // Embed verses (for indexing)
//! let verse_embeddings = embedder.embed_documents(&["In the beginning...", "Jesus wept."])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("love your neighbor")?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Called once per edition with every verse text, in corpus order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    ///
    /// Note: Some models (like BGE) use different prompts for queries vs documents.
    /// This method handles that distinction.
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

/// The embedding models versequest knows how to run locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    #[serde(rename = "all-MiniLM-L6-v2")]
    AllMiniLmL6V2,
    #[serde(rename = "bge-small-en-v1.5")]
    BgeSmallEnV15,
    #[serde(rename = "bge-large-en-v1.5")]
    BgeLargeEnV15,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::AllMiniLmL6V2,
        ModelKind::BgeSmallEnV15,
        ModelKind::BgeLargeEnV15,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::AllMiniLmL6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            ModelKind::BgeSmallEnV15 => "BAAI/bge-small-en-v1.5",
            ModelKind::BgeLargeEnV15 => "BAAI/bge-large-en-v1.5",
        }
    }

    /// Short identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ModelKind::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            ModelKind::BgeSmallEnV15 => "bge-small-en-v1.5",
            ModelKind::BgeLargeEnV15 => "bge-large-en-v1.5",
        }
    }

    pub fn dimension(self) -> usize {
        match self {
            ModelKind::AllMiniLmL6V2 | ModelKind::BgeSmallEnV15 => 384,
            ModelKind::BgeLargeEnV15 => 1024,
        }
    }

    /// Prompt prepended to queries (not documents), if the model expects one.
    pub fn query_prefix(self) -> Option<&'static str> {
        match self {
            ModelKind::AllMiniLmL6V2 => None,
            ModelKind::BgeSmallEnV15 | ModelKind::BgeLargeEnV15 => {
                Some("Represent this sentence for searching relevant passages: ")
            }
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown embedding model '{s}'")))
    }
}

mod cache;
mod local;

pub use cache::*;
pub use local::*;
