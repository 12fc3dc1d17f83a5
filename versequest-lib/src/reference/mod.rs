//! Structured citation parsing
//!
//! Recognizes a book/chapter/verse citation embedded in free text. Two
//! grammars are tried in order:
//!
//! - colon form: `John 3:16`, `1 John 2:5`, `john3:16`
//! - narrative form: `Genesis chapter 1 verse 1`, `Genesis 1 chapter 1 verse 1`
//!
//! A candidate book must be one of the edition's known books, otherwise the
//! grammar's match is discarded. Parsing never fails; a query without a
//! usable citation yields `None`, which callers treat as "search semantically".
//!
//! # Usage
//!
//! ```ignore
//! use versequest_lib::reference::{extract, BookIndex};
//!
//! let books = BookIndex::new(["John", "1 John"]);
//! let reference = extract("what does 1 John 2:5 mean?", &books);
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// A parsed citation. `book` is title-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

static COLON_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([1-3])?\s*([a-z]+-?[a-z]*)\s*(\d+):(\d+)").expect("colon form regex is valid")
});

static NARRATIVE_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([1-3])?\s?([a-z]+-?[a-z]*)\s+(?:\d+\s+)?chapter\s+(\d+)\s+verse\s+(\d+)")
        .expect("narrative form regex is valid")
});

/// Extract a citation from `query`, validated against `books`.
pub fn extract(query: &str, books: &BookIndex) -> Option<Reference> {
    let query = query.trim().to_lowercase();

    [&*COLON_FORM, &*NARRATIVE_FORM]
        .into_iter()
        .find_map(|grammar| grammar.captures(&query).and_then(|c| resolve(&c, books)))
}

fn resolve(captures: &Captures<'_>, books: &BookIndex) -> Option<Reference> {
    let book = match (captures.get(1), captures.get(2)) {
        (Some(numeral), Some(name)) => format!("{} {}", numeral.as_str(), name.as_str()),
        (None, Some(name)) => name.as_str().to_string(),
        _ => return None,
    };
    if !books.contains(&book) {
        return None;
    }

    let number = |i| {
        captures
            .get(i)?
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
    };

    Some(Reference {
        book: title_case(&book),
        chapter: number(3)?,
        verse: number(4)?,
    })
}

/// Capitalize the first letter of every word, lowercasing the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

mod books;

pub use books::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> BookIndex {
        BookIndex::new([
            "Genesis",
            "Deuteronomy",
            "John",
            "1 John",
            "2 Kings",
            "Psalms",
        ])
    }

    fn reference(book: &str, chapter: u32, verse: u32) -> Option<Reference> {
        Some(Reference {
            book: book.to_string(),
            chapter,
            verse,
        })
    }

    #[test]
    fn test_colon_form() {
        assert_eq!(extract("John 3:16", &books()), reference("John", 3, 16));
    }

    #[test]
    fn test_colon_form_with_numeral() {
        assert_eq!(extract("1 John 2:5", &books()), reference("1 John", 2, 5));
        assert_eq!(extract("2 kings 2:11", &books()), reference("2 Kings", 2, 11));
    }

    #[test]
    fn test_numeral_outside_range_is_not_part_of_book() {
        // "4" cannot start a book name, so the citation is the rest
        assert_eq!(extract("4 john 3:16", &books()), reference("John", 3, 16));
        assert_eq!(extract("4 kings 2:11", &books()), None);
    }

    #[test]
    fn test_colon_form_without_space() {
        assert_eq!(extract("john3:16", &books()), reference("John", 3, 16));
    }

    #[test]
    fn test_colon_form_embedded_in_text() {
        assert_eq!(
            extract("  what does JOHN 3:16 say about love? ", &books()),
            reference("John", 3, 16)
        );
    }

    #[test]
    fn test_narrative_form() {
        assert_eq!(
            extract("Genesis 1 chapter 1 verse 1", &books()),
            reference("Genesis", 1, 1)
        );
        assert_eq!(
            extract("genesis chapter 1 verse 2", &books()),
            reference("Genesis", 1, 2)
        );
    }

    #[test]
    fn test_narrative_form_takes_numbers_after_keywords() {
        assert_eq!(
            extract("Deuteronomy 28 chapter 1 verse 3", &books()),
            reference("Deuteronomy", 1, 3)
        );
    }

    #[test]
    fn test_narrative_form_with_numeral() {
        assert_eq!(
            extract("read 1 john chapter 2 verse 5", &books()),
            reference("1 John", 2, 5)
        );
    }

    #[test]
    fn test_unknown_book_is_discarded() {
        assert_eq!(extract("Hezekiah 3:16", &books()), None);
        assert_eq!(extract("Hezekiah chapter 1 verse 1", &books()), None);
    }

    #[test]
    fn test_narrative_form_needs_known_book() {
        let only_john = BookIndex::new(["John"]);
        assert_eq!(extract("Genesis 1 chapter 1 verse 1", &only_john), None);
    }

    #[test]
    fn test_falls_through_to_narrative_when_colon_book_unknown() {
        assert_eq!(
            extract("hezekiah 1:1 or genesis chapter 1 verse 1", &books()),
            reference("Genesis", 1, 1)
        );
    }

    #[test]
    fn test_no_citation() {
        assert_eq!(extract("love your neighbor", &books()), None);
        assert_eq!(extract("", &books()), None);
        assert_eq!(extract("3:16", &books()), None);
        assert_eq!(extract("John 3", &books()), None);
    }

    #[test]
    fn test_zero_or_overflowing_numbers_discard_match() {
        assert_eq!(extract("John 0:16", &books()), None);
        assert_eq!(extract("John 3:99999999999", &books()), None);
    }

    #[test]
    fn test_malformed_input_never_panics() {
        for query in ["::::", "chapter verse", "1 2 3", "john -3:16", "ñ 3:16", "1 chapter 1 verse 1"] {
            let _ = extract(query, &books());
        }
    }

    #[test]
    fn test_empty_index_matches_nothing() {
        assert_eq!(extract("John 3:16", &BookIndex::default()), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("1 john"), "1 John");
        assert_eq!(title_case("song of solomon"), "Song Of Solomon");
        assert_eq!(title_case("jean-baptiste"), "Jean-Baptiste");
    }
}
