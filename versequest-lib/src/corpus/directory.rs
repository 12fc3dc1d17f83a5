use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::corpus::{DocumentSource, Edition};
use crate::{Error, Result};

/// Reads `<root>/<edition>.json` from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the edition's document.
    pub fn path(&self, edition: Edition) -> PathBuf {
        self.root.join(format!("{edition}.json"))
    }
}

impl DocumentSource for DirectorySource {
    fn read(&self, edition: Edition) -> Result<String> {
        let path = self.path(edition);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::CorpusNotFound {
                edition: edition.to_string(),
                path,
            },
            _ => Error::malformed(edition, format!("could not read {}: {e}", path.display())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_uses_edition_id() {
        let source = DirectorySource::new("/data");
        assert_eq!(source.path(Edition::KjvStrongs), PathBuf::from("/data/kjv_strongs.json"));
    }

    #[test]
    fn test_read_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("web.json"), r#"{"verses": []}"#).unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.read(Edition::Web).unwrap(), r#"{"verses": []}"#);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.read(Edition::Tyndale).unwrap_err();
        assert!(matches!(err, Error::CorpusNotFound { edition, .. } if edition == "tyndale"));
    }
}
