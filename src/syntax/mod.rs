//! Syntax-tree query service.
//!
//! Parses documents into immutable `SyntaxSnapshot`s and answers the two
//! queries the classifier needs: "smallest node exactly covering a span"
//! and "parent of a node". Snapshots pin the text they were parsed from
//! via a content hash, so a snapshot can never silently classify against
//! edited text.

pub mod shape;

use crate::document::Document;
use crate::error::{HaloError, Result};
use crate::span::Span;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Programming languages supported by Halo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Rust (.rs)
    Rust,
    /// Python (.py)
    Python,
    /// C (.c, .h)
    C,
    /// C++ (.cpp, .hpp, .cc, .cxx)
    Cpp,
    /// Java (.java)
    Java,
    /// JavaScript (.js, .mjs, .cjs)
    JavaScript,
    /// TypeScript (.ts, .tsx)
    TypeScript,
}

impl Language {
    /// Convert language to string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }

    /// Detect language from file path extension.
    ///
    /// Table-driven extension mapping. Returns None for unknown
    /// extensions; never infers from content.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        let language = match extension {
            "rs" => Language::Rust,
            "py" => Language::Python,
            "c" | "h" => Language::C,
            "cpp" | "hpp" | "cc" | "cxx" => Language::Cpp,
            "java" => Language::Java,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "tsx" => Language::TypeScript,
            _ => return None,
        };

        Some(language)
    }

    /// The tree-sitter grammar for this language.
    fn grammar(&self, path: &Path) -> tree_sitter::Language {
        match self {
            Language::Rust => tree_sitter_rust::language(),
            Language::Python => tree_sitter_python::language(),
            Language::C => tree_sitter_c::language(),
            Language::Cpp => tree_sitter_cpp::language(),
            Language::Java => tree_sitter_java::language(),
            Language::JavaScript => tree_sitter_javascript::language(),
            Language::TypeScript => {
                if path.extension().and_then(|e| e.to_str()) == Some("tsx") {
                    tree_sitter_typescript::language_tsx()
                } else {
                    tree_sitter_typescript::language_typescript()
                }
            }
        }
    }
}

/// An immutable parse of one document's text.
///
/// Owns a copy of the source bytes so nodes can be inspected without
/// keeping the originating `Document` alive. The content hash records
/// which text the tree belongs to.
pub struct SyntaxSnapshot {
    /// Path of the parsed file.
    path: PathBuf,
    /// Source bytes the tree was parsed from.
    source: Vec<u8>,
    /// Language the source was parsed as.
    language: Language,
    /// SHA-256 hex hash of the source text at parse time.
    content_hash: String,
    /// The parsed tree.
    tree: Tree,
}

impl SyntaxSnapshot {
    /// Parse a document into a snapshot.
    pub fn parse(document: &Document) -> Result<Self> {
        let language = document.language();
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar(document.path()))
            .map_err(|e| HaloError::Parse {
                file: document.path().to_path_buf(),
                message: format!("Failed to set {} language: {:?}", language.as_str(), e),
            })?;

        let tree = parser
            .parse(document.text(), None)
            .ok_or_else(|| HaloError::Parse {
                file: document.path().to_path_buf(),
                message: "Parse failed - no tree returned".to_string(),
            })?;

        Ok(Self {
            path: document.path().to_path_buf(),
            source: document.text().as_bytes().to_vec(),
            language,
            content_hash: document.content_hash(),
            tree,
        })
    }

    /// Path of the parsed file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source bytes the tree was parsed from.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Language the snapshot was parsed as.
    pub fn language(&self) -> Language {
        self.language
    }

    /// SHA-256 hex hash of the source at parse time.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Root node of the parse tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Check that a document still carries the exact text this snapshot
    /// was parsed from.
    ///
    /// # Errors
    /// Returns `StaleSnapshot` when the document text has diverged.
    pub fn verify(&self, document: &Document) -> Result<()> {
        if document.content_hash() != self.content_hash {
            return Err(HaloError::StaleSnapshot {
                file: self.path.clone(),
            });
        }
        Ok(())
    }

    /// Find the smallest node whose byte range exactly equals `span`.
    ///
    /// Returns None when the span does not line up with any node, which
    /// callers treat as a tree/text mismatch.
    pub fn node_covering_span(&self, span: Span) -> Option<Node<'_>> {
        if span.end > self.source.len() {
            return None;
        }
        let node = self
            .root()
            .named_descendant_for_byte_range(span.start, span.end)?;
        if node.start_byte() == span.start && node.end_byte() == span.end {
            Some(node)
        } else {
            None
        }
    }

    /// Find the smallest named node containing a byte offset.
    pub fn node_at_offset(&self, offset: usize) -> Option<Node<'_>> {
        if offset >= self.source.len() {
            return None;
        }
        self.root().named_descendant_for_byte_range(offset, offset)
    }

    /// UTF-8 text of a node within this snapshot.
    pub fn node_text<'a>(&'a self, node: Node<'a>) -> Result<&'a str> {
        node.utf8_text(&self.source).map_err(HaloError::Utf8)
    }
}

/// Node kinds that name a symbol occurrence across the supported grammars.
pub(crate) const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "property_identifier",
    "type_identifier",
    "shorthand_property_identifier",
];

/// Whether a node kind is an identifier-like leaf.
pub(crate) fn is_identifier_kind(kind: &str) -> bool {
    IDENTIFIER_KINDS.contains(&kind)
}
