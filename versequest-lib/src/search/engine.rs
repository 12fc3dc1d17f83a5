use std::sync::Arc;

use tracing::debug;

use crate::corpus::{Corpus, CorpusStore, Edition, Verse};
use crate::embed::{Embedder, Embedding, EmbeddingCache};
use crate::reference;
use crate::search::{rank, MatchType, SearchOptions, SearchResult, UnresolvedReference};
use crate::store::VectorStore;
use crate::{Error, Result};

/// Retrieval engine: citation lookup first, semantic ranking as fallback.
///
/// Holds no per-request state; share it behind an `Arc` and call it from as
/// many threads as needed. Editions are loaded and embedded on first use.
pub struct SearchEngine<E: Embedder, S: VectorStore> {
    corpora: CorpusStore,
    embeddings: EmbeddingCache<E, S>,
    options: SearchOptions,
}

impl<E: Embedder, S: VectorStore> SearchEngine<E, S> {
    #[must_use]
    pub fn new(corpora: CorpusStore, embeddings: EmbeddingCache<E, S>, options: SearchOptions) -> Self {
        Self {
            corpora,
            embeddings,
            options,
        }
    }

    /// Find the verses that best answer `query` in `edition`.
    ///
    /// A query citing an existing verse returns exactly that verse with
    /// score 1.0. Otherwise returns up to `top_k` semantic matches, best
    /// first.
    pub fn search(&self, query: &str, edition: &str) -> Result<Vec<SearchResult>> {
        let edition: Edition = edition.parse()?;
        let corpus = self.corpora.load(edition)?;

        if let Some(cited) = reference::extract(query, corpus.book_index()) {
            if let Some(verse) = corpus.find(&cited.book, cited.chapter, cited.verse) {
                debug!(%edition, id = %verse.id, "reference match");
                return Ok(vec![SearchResult::new(
                    verse,
                    edition,
                    1.0,
                    MatchType::Reference,
                )]);
            }

            match self.options.unresolved_reference {
                UnresolvedReference::NotFound => {
                    debug!(%edition, ?cited, "cited verse does not exist");
                    return Ok(Vec::new());
                }
                UnresolvedReference::FallBack => {
                    debug!(%edition, ?cited, "cited verse does not exist, searching semantically");
                }
            }
        }

        self.semantic(query, &corpus)
    }

    fn semantic(&self, query: &str, corpus: &Corpus) -> Result<Vec<SearchResult>> {
        let edition = corpus.edition();
        let vectors = self.embeddings.ensure(edition, corpus.verses())?;
        let query_vector = self.embeddings.embed_query(query)?;
        if query_vector.len() != self.embeddings.dimension() {
            return Err(Error::EmbeddingUnavailable(format!(
                "query embedding has {} dimensions, expected {}",
                query_vector.len(),
                self.embeddings.dimension()
            )));
        }

        let ranked = rank(&query_vector, &vectors, self.options.top_k);
        debug!(%edition, results = ranked.len(), "semantic search");

        Ok(ranked
            .into_iter()
            .map(|(i, score)| {
                SearchResult::new(&corpus.verses()[i], edition, score, MatchType::Semantic)
            })
            .collect())
    }

    /// The supported editions.
    pub fn editions(&self) -> &'static [Edition] {
        &Edition::ALL
    }

    /// Sorted book names of an edition.
    pub fn books(&self, edition: &str) -> Result<Vec<String>> {
        Ok(self.corpus(edition)?.books().to_vec())
    }

    /// Sorted chapter numbers of a book.
    pub fn chapters(&self, edition: &str, book: &str) -> Result<Vec<u32>> {
        let chapters = self.corpus(edition)?.chapters(book);
        if chapters.is_empty() {
            return Err(Error::NotFound(format!("book '{book}'")));
        }
        Ok(chapters)
    }

    /// All verses of one chapter, in order.
    pub fn chapter(&self, edition: &str, book: &str, chapter: u32) -> Result<Vec<Verse>> {
        let verses: Vec<Verse> = self
            .corpus(edition)?
            .chapter(book, chapter)
            .into_iter()
            .cloned()
            .collect();
        if verses.is_empty() {
            return Err(Error::NotFound(format!("{book} {chapter}")));
        }
        Ok(verses)
    }

    /// A single verse by citation.
    pub fn verse(&self, edition: &str, book: &str, chapter: u32, verse: u32) -> Result<Verse> {
        self.corpus(edition)?
            .find(book, chapter, verse)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{book} {chapter}:{verse}")))
    }

    /// Load an edition and its embeddings ahead of the first query.
    pub fn warm(&self, edition: &str) -> Result<()> {
        let corpus = self.corpus(edition)?;
        self.embeddings.ensure(corpus.edition(), corpus.verses())?;
        Ok(())
    }

    /// Embed arbitrary text with the engine's model.
    pub fn embed_text(&self, text: &str) -> Result<Embedding> {
        self.embeddings.embed_query(text)
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn corpora(&self) -> &CorpusStore {
        &self.corpora
    }

    pub fn embeddings(&self) -> &EmbeddingCache<E, S> {
        &self.embeddings
    }

    fn corpus(&self, edition: &str) -> Result<Arc<Corpus>> {
        self.corpora.load(edition.parse()?)
    }
}
