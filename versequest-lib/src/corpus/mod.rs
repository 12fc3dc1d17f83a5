//! Verse corpora, one per edition
//!
//! Each edition is backed by a JSON document holding a flat, ordered list of
//! verse records:
//!
//! ```json
//! { "verses": [ { "book_name": "Genesis", "chapter": 1, "verse": 1, "text": "In the beginning..." } ] }
//! ```
//!
//! Documents are read through a [`DocumentSource`], validated, and published
//! as an immutable [`Corpus`] by the [`CorpusStore`], which keeps every
//! loaded edition for the lifetime of the process.
//!
//! # Usage
//!
//! ```ignore
//! use versequest_lib::corpus::{CorpusStore, DirectorySource, Edition};
//!
//! let store = CorpusStore::new(DirectorySource::new("data"));
//! let kjv = store.load(Edition::Kjv)?;
//! let verse = kjv.find("John", 3, 16);
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reference::BookIndex;
use crate::{Error, Result};

/// A supported edition (translation) of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    Asv,
    Asvs,
    Bishops,
    Coverdale,
    Geneva,
    KjvStrongs,
    Kjv,
    Net,
    Tyndale,
    Web,
}

impl Edition {
    /// Every supported edition, in listing order.
    pub const ALL: [Edition; 10] = [
        Edition::Asv,
        Edition::Asvs,
        Edition::Bishops,
        Edition::Coverdale,
        Edition::Geneva,
        Edition::KjvStrongs,
        Edition::Kjv,
        Edition::Net,
        Edition::Tyndale,
        Edition::Web,
    ];

    /// The lowercase identifier, also used as the document and cache key.
    pub fn as_str(self) -> &'static str {
        match self {
            Edition::Asv => "asv",
            Edition::Asvs => "asvs",
            Edition::Bishops => "bishops",
            Edition::Coverdale => "coverdale",
            Edition::Geneva => "geneva",
            Edition::KjvStrongs => "kjv_strongs",
            Edition::Kjv => "kjv",
            Edition::Net => "net",
            Edition::Tyndale => "tyndale",
            Edition::Web => "web",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim().to_lowercase();
        Edition::ALL
            .into_iter()
            .find(|edition| edition.as_str() == id)
            .ok_or_else(|| Error::UnsupportedEdition(s.to_string()))
    }
}

/// A single verse. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Verse {
    /// `edition:book_name:chapter:verse`, unique within an edition
    pub id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl Verse {
    /// Whether this verse is `book chapter:verse`, comparing book names
    /// case-insensitively.
    pub fn is(&self, book: &str, chapter: u32, verse: u32) -> bool {
        self.chapter == chapter && self.verse == verse && self.in_book(book)
    }

    fn in_book(&self, book: &str) -> bool {
        BookIndex::fold(&self.book_name) == BookIndex::fold(book)
    }
}

/// One loaded edition: its verses in document order and its book names.
#[derive(Debug)]
pub struct Corpus {
    edition: Edition,
    verses: Vec<Verse>,
    books: BookIndex,
}

#[derive(Deserialize)]
struct Document {
    verses: Vec<RawVerse>,
}

#[derive(Deserialize)]
struct RawVerse {
    book_name: String,
    chapter: i64,
    verse: i64,
    text: String,
}

impl Corpus {
    /// Parse and validate an edition's JSON document.
    pub fn parse(edition: Edition, document: &str) -> Result<Self> {
        let document: Document =
            serde_json::from_str(document).map_err(|e| Error::malformed(edition, e.to_string()))?;

        if document.verses.is_empty() {
            return Err(Error::malformed(edition, "verse list is empty"));
        }

        let mut seen = HashSet::with_capacity(document.verses.len());
        let mut verses = Vec::with_capacity(document.verses.len());
        for (position, raw) in document.verses.into_iter().enumerate() {
            let verse = validate(edition, position, raw)?;
            if !seen.insert(verse.id.clone()) {
                return Err(Error::malformed(
                    edition,
                    format!("duplicate verse id '{}'", verse.id),
                ));
            }
            verses.push(verse);
        }

        let books = BookIndex::new(verses.iter().map(|v| v.book_name.as_str()));
        Ok(Self {
            edition,
            verses,
            books,
        })
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    /// Verses in document order.
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Always false for a validated corpus.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// The book name index used for reference parsing.
    pub fn book_index(&self) -> &BookIndex {
        &self.books
    }

    /// Distinct book names, sorted.
    pub fn books(&self) -> &[String] {
        self.books.names()
    }

    /// Sorted chapter numbers of `book`; empty if the book is unknown.
    pub fn chapters(&self, book: &str) -> Vec<u32> {
        self.verses
            .iter()
            .filter(|v| v.in_book(book))
            .map(|v| v.chapter)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Verses of one chapter, in document order.
    pub fn chapter(&self, book: &str, chapter: u32) -> Vec<&Verse> {
        self.verses
            .iter()
            .filter(|v| v.chapter == chapter && v.in_book(book))
            .collect()
    }

    /// Look up a single verse. Linear scan; book names compare case-insensitively.
    pub fn find(&self, book: &str, chapter: u32, verse: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.is(book, chapter, verse))
    }
}

fn validate(edition: Edition, position: usize, raw: RawVerse) -> Result<Verse> {
    let book_name = raw.book_name.trim();
    if book_name.is_empty() {
        return Err(Error::malformed(
            edition,
            format!("verse {position} has an empty book_name"),
        ));
    }

    let number = |value: i64, field: &str| {
        u32::try_from(value)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                Error::malformed(
                    edition,
                    format!("verse {position} has invalid {field} {value}"),
                )
            })
    };
    let chapter = number(raw.chapter, "chapter")?;
    let verse = number(raw.verse, "verse")?;

    Ok(Verse {
        id: format!("{edition}:{book_name}:{chapter}:{verse}"),
        book_name: book_name.to_string(),
        chapter,
        verse,
        text: raw.text,
    })
}

/// Source of raw edition documents.
pub trait DocumentSource: Send + Sync {
    /// Read the edition's JSON document.
    ///
    /// Fails with [`Error::CorpusNotFound`] if the document does not exist.
    fn read(&self, edition: Edition) -> Result<String>;
}

mod directory;
mod store;

pub use directory::*;
pub use store::*;
