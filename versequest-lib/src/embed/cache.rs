use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cells::EditionCells;
use crate::corpus::{Edition, Verse};
use crate::embed::{Embedder, Embedding};
use crate::store::{StoredVectors, VectorStore};
use crate::{Error, Result};

/// Per-edition verse embeddings, generated once and persisted.
///
/// The embedder sits behind a mutex: model inference is never reentered, and
/// a cold edition is embedded by exactly one caller while concurrent callers
/// for the same edition wait for its result.
pub struct EmbeddingCache<E: Embedder, S: VectorStore> {
    embedder: Mutex<E>,
    model: String,
    dimension: usize,
    store: S,
    editions: EditionCells<Arc<Vec<Embedding>>>,
}

impl<E: Embedder, S: VectorStore> EmbeddingCache<E, S> {
    pub fn new(embedder: E, store: S) -> Self {
        let model = embedder.model_name().to_string();
        let dimension = embedder.dimension();
        Self {
            embedder: Mutex::new(embedder),
            model,
            dimension,
            store,
            editions: EditionCells::new(),
        }
    }

    /// Vectors for `verses`, aligned by index.
    ///
    /// Uses the persisted record when it matches the model and verse count,
    /// otherwise embeds every verse text in a single batch and persists the
    /// result. A model failure leaves the edition cold.
    pub fn ensure(&self, edition: Edition, verses: &[Verse]) -> Result<Arc<Vec<Embedding>>> {
        if let Some(vectors) = self.editions.get(edition) {
            if vectors.len() == verses.len() {
                return Ok(vectors);
            }
            warn!(
                %edition,
                cached = vectors.len(),
                verses = verses.len(),
                "in-memory embeddings do not match verse count, regenerating"
            );
            let vectors = Arc::new(self.load_or_generate(edition, verses)?);
            self.editions.set(edition, Arc::clone(&vectors));
            return Ok(vectors);
        }

        self.editions.get_or_try_init(edition, || {
            self.load_or_generate(edition, verses).map(Arc::new)
        })
    }

    /// Whether the edition's vectors are ready in memory.
    pub fn is_warm(&self, edition: Edition) -> bool {
        self.editions.get(edition).is_some()
    }

    /// Embed a query with the same model that produced the verse vectors.
    pub fn embed_query(&self, text: &str) -> Result<Embedding> {
        self.embedder.lock().embed_query(text).map_err(unavailable)
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_or_generate(&self, edition: Edition, verses: &[Verse]) -> Result<Vec<Embedding>> {
        let key = edition.as_str();

        match self.store.read(key) {
            Ok(Some(stored)) if stored.is_fresh(&self.model, self.dimension, verses.len()) => {
                debug!(%edition, vectors = stored.len(), "loaded cached embeddings");
                return Ok(stored.vectors);
            }
            Ok(Some(stored)) => info!(
                %edition,
                cached_model = %stored.model,
                cached = stored.len(),
                verses = verses.len(),
                "cached embeddings are stale"
            ),
            Ok(None) => debug!(%edition, "no cached embeddings"),
            Err(e) => warn!(%edition, error = %e, "ignoring unreadable embedding cache"),
        }

        info!(
            %edition,
            verses = verses.len(),
            model = %self.model,
            "generating embeddings (this may take a while)"
        );
        let texts: Vec<&str> = verses.iter().map(|v| v.text.as_str()).collect();
        let vectors = self
            .embedder
            .lock()
            .embed_documents(&texts)
            .map_err(unavailable)?;

        if vectors.len() != verses.len() {
            return Err(Error::EmbeddingUnavailable(format!(
                "model returned {} embeddings for {} verses",
                vectors.len(),
                verses.len()
            )));
        }

        let stored = StoredVectors::new(self.model.clone(), vectors);
        match self.store.write(key, &stored) {
            Ok(()) => info!(%edition, vectors = stored.len(), "cached embeddings"),
            Err(e) => warn!(%edition, error = %e, "failed to persist embeddings"),
        }
        Ok(stored.vectors)
    }
}

fn unavailable(e: Error) -> Error {
    match e {
        Error::EmbeddingUnavailable(_) => e,
        other => Error::EmbeddingUnavailable(other.to_string()),
    }
}
