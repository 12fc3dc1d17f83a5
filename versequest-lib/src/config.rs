//! Engine configuration
//!
//! Every field has a default, so an empty (or absent) file is a valid
//! configuration:
//!
//! ```toml
//! data_dir = "data"
//! cache_dir = "cache"
//! model_cache_dir = "models"
//! model = "all-MiniLM-L6-v2"
//! top_k = 5
//! unresolved_reference = "fall-back"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::corpus::{CorpusStore, DirectorySource};
use crate::embed::{EmbeddingCache, LocalEmbedder, ModelKind};
use crate::search::{SearchEngine, SearchOptions, UnresolvedReference};
use crate::store::DiskStore;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `<edition>.json` documents
    pub data_dir: PathBuf,
    /// Directory for persisted embeddings
    pub cache_dir: PathBuf,
    /// Where embedding models are downloaded to
    pub model_cache_dir: Option<PathBuf>,
    pub model: ModelKind,
    pub top_k: usize,
    pub unresolved_reference: UnresolvedReference,
}

impl Default for Config {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            data_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from("cache"),
            model_cache_dir: None,
            model: ModelKind::default(),
            top_k: options.top_k,
            unresolved_reference: options.unresolved_reference,
        }
    }
}

impl Config {
    /// Parse a TOML configuration.
    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            top_k: self.top_k,
            unresolved_reference: self.unresolved_reference,
        }
    }

    /// Build an engine over the local model and on-disk caches.
    ///
    /// The embedding model is not loaded until the first semantic query, so
    /// citations and browsing work without it.
    pub fn engine(&self) -> SearchEngine<LocalEmbedder, DiskStore> {
        info!(model = %self.model, data_dir = %self.data_dir.display(), "starting engine");
        let embedder = LocalEmbedder::new(self.model, self.model_cache_dir.clone());

        SearchEngine::new(
            CorpusStore::new(DirectorySource::new(&self.data_dir)),
            EmbeddingCache::new(embedder, DiskStore::new(&self.cache_dir)),
            self.search_options(),
        )
    }
}
