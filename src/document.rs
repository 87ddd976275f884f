//! Documents and document sets.
//!
//! A `Document` is one file's text plus its detected language. A
//! `DocumentSet` is the fixed search scope for a resolve cycle: the
//! locator never looks outside it. Documents are plain read-only
//! snapshots; re-reading a changed file means building a new `Document`.

use crate::error::{HaloError, Result};
use crate::syntax::Language;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// One source file's text, pinned at read time.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path of the source file.
    path: PathBuf,
    /// Full text content.
    text: String,
    /// Detected or supplied language.
    language: Language,
}

impl Document {
    /// Build a document from in-memory text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            language,
        }
    }

    /// Read a document from disk, detecting its language from the
    /// file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let language = Language::from_path(path).ok_or_else(|| HaloError::UnknownLanguage {
            path: path.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| HaloError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
            language,
        })
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Language of the document.
    pub fn language(&self) -> Language {
        self.language
    }

    /// SHA-256 hash of the document text, as lowercase hex.
    ///
    /// Used to pin syntax snapshots to the exact text they were parsed
    /// from; see `SyntaxSnapshot::verify`.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// The fixed set of documents searched during one resolve cycle.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Create an empty document set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of documents.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Add a document to the set.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Look up a document by path.
    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.path() == path)
    }

    /// Whether the set contains a document with the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Iterate over all documents in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Number of documents in the set.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_changes_with_text() {
        let a = Document::new("a.c", "int x;", Language::C);
        let b = Document::new("a.c", "int y;", Language::C);
        assert_ne!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash(), a.clone().content_hash());
    }

    #[test]
    fn test_document_set_lookup() {
        let mut set = DocumentSet::new();
        assert!(set.is_empty());
        set.push(Document::new("main.c", "int main() {}", Language::C));
        assert_eq!(set.len(), 1);
        assert!(set.contains(Path::new("main.c")));
        assert!(!set.contains(Path::new("other.c")));
    }
}
