use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embed::{Embedder, Embedding, ModelKind};
use crate::{Error, Result};

/// Local sentence-embedding model run through fastembed.
///
/// The model is loaded on the first embedding call, downloading it into
/// `cache_dir` (fastembed's default location when `None`) if needed. A failed
/// load is retried on the next call.
pub struct LocalEmbedder {
    model: Option<TextEmbedding>,
    kind: ModelKind,
    cache_dir: Option<PathBuf>,
}

impl LocalEmbedder {
    pub fn new(kind: ModelKind, cache_dir: Option<PathBuf>) -> Self {
        Self {
            model: None,
            kind,
            cache_dir,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Whether the model has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn model(&mut self) -> Result<&mut TextEmbedding> {
        let model = match self.model.take() {
            Some(model) => model,
            None => {
                info!(model = %self.kind, "loading embedding model");
                let mut opts = InitOptions::new(fastembed_model(self.kind))
                    .with_show_download_progress(true);
                if let Some(dir) = &self.cache_dir {
                    opts = opts.with_cache_dir(dir.clone());
                }
                TextEmbedding::try_new(opts)
                    .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?
            }
        };
        Ok(self.model.insert(model))
    }
}

fn fastembed_model(kind: ModelKind) -> EmbeddingModel {
    match kind {
        ModelKind::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
        ModelKind::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
        ModelKind::BgeLargeEnV15 => EmbeddingModel::BGELargeENV15,
    }
}

impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        self.kind.name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.model()?
            .embed(texts, None)
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        let query_text = match self.kind.query_prefix() {
            Some(prefix) => format!("{prefix}{text}"),
            None => text.to_string(),
        };

        self.model()?
            .embed(vec![query_text], None)
            .map_err(|e| Error::EmbeddingUnavailable(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmbeddingUnavailable("model returned no embeddings".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::cosine_similarity;

    #[test]
    fn test_new_defers_model_load() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = LocalEmbedder::new(ModelKind::BgeSmallEnV15, Some(dir.path().to_path_buf()));

        assert!(!embedder.is_loaded());
        assert_eq!(embedder.dimension(), 384);
        assert_eq!(embedder.model_name(), ModelKind::BgeSmallEnV15.name());
        // nothing downloaded yet
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    #[ignore] // Requires model download, run with: cargo test -- --ignored
    fn test_dimension_matches_model() {
        let mut embedder = LocalEmbedder::new(ModelKind::AllMiniLmL6V2, None);
        let embedding = embedder.embed_query("The LORD is my shepherd").unwrap();
        assert_eq!(embedding.len(), embedder.dimension());
    }

    #[test]
    #[ignore] // Requires model download
    fn test_related_verse_scores_higher() {
        let mut embedder = LocalEmbedder::new(ModelKind::AllMiniLmL6V2, None);

        let verses = embedder
            .embed_documents(&[
                "Thou shalt love thy neighbour as thyself.",
                "And the earth was without form, and void.",
            ])
            .unwrap();
        let query = embedder.embed_query("love your neighbor").unwrap();

        let related = cosine_similarity(&query, &verses[0]);
        let unrelated = cosine_similarity(&query, &verses[1]);
        assert!(
            related > unrelated,
            "Related verse should score higher: {related:.4} vs {unrelated:.4}",
        );
    }
}
