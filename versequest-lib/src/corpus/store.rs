use std::sync::Arc;

use tracing::{debug, info};

use crate::cells::EditionCells;
use crate::corpus::{Corpus, DocumentSource, Edition};
use crate::Result;

/// Process-wide cache of loaded editions.
///
/// Each edition is read and validated at most once; later calls return the
/// same `Arc<Corpus>`. Editions are never evicted. A failed load is not
/// cached, so the next call reads the document again.
pub struct CorpusStore {
    source: Box<dyn DocumentSource>,
    editions: EditionCells<Arc<Corpus>>,
}

impl CorpusStore {
    pub fn new(source: impl DocumentSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            editions: EditionCells::new(),
        }
    }

    /// Load an edition, reading its document on first use.
    pub fn load(&self, edition: Edition) -> Result<Arc<Corpus>> {
        if let Some(corpus) = self.editions.get(edition) {
            return Ok(corpus);
        }

        self.editions.get_or_try_init(edition, || {
            debug!(%edition, "reading corpus document");
            let document = self.source.read(edition)?;
            let corpus = Corpus::parse(edition, &document)?;
            info!(
                %edition,
                verses = corpus.len(),
                books = corpus.books().len(),
                "loaded corpus"
            );
            Ok(Arc::new(corpus))
        })
    }

    /// Whether the edition has already been loaded in this process.
    pub fn is_loaded(&self, edition: Edition) -> bool {
        self.editions.get(edition).is_some()
    }
}
