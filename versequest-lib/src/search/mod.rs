//! High-level search interface
//!
//! Combines the corpus store, reference parser and embedding cache into a
//! single retrieval API: a query naming a verse ("John 3:16") resolves to
//! that verse, anything else is ranked by semantic similarity.
//!
//! # Usage
//!
//! ```ignore
//! use versequest_lib::search::{SearchEngine, SearchOptions};
//!
//! let engine = SearchEngine::new(corpora, embeddings, SearchOptions::default());
//! let exact = engine.search("John 3:16", "kjv")?;          // one reference match
//! let ranked = engine.search("love your neighbor", "kjv")?; // top-k semantic matches
//! ```

use serde::{Deserialize, Serialize};

use crate::corpus::{Edition, Verse};

/// How a result was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The query contained a citation of this verse
    Reference,
    /// Ranked by embedding similarity
    Semantic,
}

/// A search result with similarity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    /// Cosine similarity in [-1, 1] for semantic matches, 1.0 for references
    pub score: f32,
    pub match_type: MatchType,
    pub edition: Edition,
}

impl SearchResult {
    fn new(verse: &Verse, edition: Edition, score: f32, match_type: MatchType) -> Self {
        Self {
            id: verse.id.clone(),
            book_name: verse.book_name.clone(),
            chapter: verse.chapter,
            verse: verse.verse,
            text: verse.text.clone(),
            score,
            match_type,
            edition,
        }
    }
}

/// What to do when a query cites a verse that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReference {
    /// Search semantically instead
    #[default]
    FallBack,
    /// Return no results
    NotFound,
}

/// Tunables for [`SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of semantic results
    pub top_k: usize,
    pub unresolved_reference: UnresolvedReference,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            unresolved_reference: UnresolvedReference::default(),
        }
    }
}

mod engine;
mod rank;

pub use engine::*;
pub use rank::*;
