//! Shared test fixtures: a small corpus and deterministic stand-ins for the
//! document source and the embedding model.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use crate::corpus::{DocumentSource, Edition};
use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

const VERSES: &[(&str, u32, u32, &str)] = &[
    ("Genesis", 1, 1, "In the beginning God created the heaven and the earth."),
    ("Genesis", 1, 2, "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters."),
    ("Leviticus", 19, 18, "Thou shalt not avenge, nor bear any grudge against the children of thy people, but thou shalt love thy neighbour as thyself: I am the LORD."),
    ("Deuteronomy", 28, 3, "Blessed shalt thou be in the city, and blessed shalt thou be in the field."),
    ("Psalms", 23, 1, "The LORD is my shepherd; I shall not want."),
    ("Matthew", 22, 39, "And the second is like unto it, Thou shalt love thy neighbour as thyself."),
    ("John", 3, 16, "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life."),
    ("John", 3, 17, "For God sent not his Son into the world to condemn the world; but that the world through him might be saved."),
    ("1 John", 2, 5, "But whoso keepeth his word, in him verily is the love of God perfected: hereby know we that we are in him."),
];

/// Number of verses in [`sample_document`].
pub(crate) const SAMPLE_LEN: usize = VERSES.len();

/// A small KJV-style edition document.
pub(crate) fn sample_document() -> String {
    document(VERSES)
}

pub(crate) fn document(verses: &[(&str, u32, u32, &str)]) -> String {
    let verses: Vec<_> = verses
        .iter()
        .map(|(book, chapter, verse, text)| {
            serde_json::json!({
                "book_name": book,
                "chapter": chapter,
                "verse": verse,
                "text": text,
            })
        })
        .collect();
    serde_json::json!({ "verses": verses }).to_string()
}

/// A temp directory holding the sample document for each edition.
pub(crate) fn corpus_dir(editions: &[Edition]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for edition in editions {
        std::fs::write(dir.path().join(format!("{edition}.json")), sample_document()).unwrap();
    }
    dir
}

/// Serves the sample document for every edition and counts reads.
pub(crate) struct CountingSource {
    reads: Arc<AtomicUsize>,
}

impl CountingSource {
    pub(crate) fn new() -> Self {
        Self {
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn reads(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl DocumentSource for CountingSource {
    fn read(&self, _edition: Edition) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(10));
        Ok(sample_document())
    }
}

const FAKE_DIM: usize = 64;

/// Bag-of-words embedder: each lowercase word bumps one hashed dimension.
///
/// Counts batch calls and can be switched into a failing state.
#[derive(Clone)]
pub(crate) struct FakeEmbedder {
    name: String,
    batches: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl FakeEmbedder {
    pub(crate) fn new() -> Self {
        Self::named("fake-bow")
    }

    pub(crate) fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            batches: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of `embed_documents` calls so far.
    pub(crate) fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::EmbeddingUnavailable("model offline".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn bag_of_words(text: &str) -> Embedding {
    let mut vector = vec![0.0; FAKE_DIM];
    let words = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    for word in words {
        let hash = word
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x100_0000_01b3));
        vector[(hash % FAKE_DIM as u64) as usize] += 1.0;
    }
    vector
}

impl Embedder for FakeEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        thread::sleep(Duration::from_millis(20));
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.check()?;
        Ok(bag_of_words(text))
    }

    fn dimension(&self) -> usize {
        FAKE_DIM
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
