use std::collections::{BTreeSet, HashSet};

/// The distinct book names of one edition.
///
/// Membership is tested on case-folded names, so `"1 JOHN"`, `"1 john"` and
/// `"1  John"` all refer to the same book.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    folded: HashSet<String>,
    names: Vec<String>,
}

impl BookIndex {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: BTreeSet<&str> = names.into_iter().collect();
        Self {
            folded: names.iter().map(|name| Self::fold(name)).collect(),
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    /// Normalize a book name for comparison: lowercase, single spaces.
    pub fn fold(name: &str) -> String {
        name.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.folded.contains(&Self::fold(name))
    }

    /// Book names as they appear in the corpus, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
