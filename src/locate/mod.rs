//! Reference location.
//!
//! For a resolved symbol and a fixed document set, produces the raw
//! reference sequence: the symbol's own declaration locations first
//! (tagged Declaration), then every finder occurrence per document
//! (tagged Unclassified, pending classification). Production is an
//! explicit channel producer so the consumer can classify each item as
//! it arrives; `collect_references` is the strict convenience form.

mod finder;

use crate::cancel::CancellationToken;
use crate::classify::UsageKind;
use crate::document::DocumentSet;
use crate::error::Result;
use crate::span::Span;
use crate::symbol::Symbol;
use crate::syntax::SyntaxSnapshot;
use crossbeam_channel::Sender;
use ropey::Rope;
use serde::Serialize;
use std::path::PathBuf;

/// Tag on a raw reference before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTag {
    /// Sourced from the symbol's own declaration list.
    Declaration,
    /// Usage site awaiting classification.
    Unclassified,
}

/// A raw (symbol, file, span) reference produced by the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// Name of the referenced symbol.
    pub symbol: String,
    /// File containing the reference.
    pub file: PathBuf,
    /// Byte span of the reference.
    pub span: Span,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (0-based, in bytes).
    pub column: usize,
    /// Declaration or unclassified.
    pub tag: RawTag,
}

impl RawReference {
    /// Attach a usage kind, producing a classified reference.
    pub fn into_reference(self, kind: UsageKind) -> Reference {
        Reference {
            symbol: self.symbol,
            file: self.file,
            span: self.span,
            line: self.line,
            column: self.column,
            kind,
        }
    }
}

/// A classified reference to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Name of the referenced symbol.
    pub symbol: String,
    /// File containing the reference.
    pub file: PathBuf,
    /// Byte span of the reference.
    pub span: Span,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (0-based, in bytes).
    pub column: usize,
    /// How the reference uses the symbol.
    pub kind: UsageKind,
}

/// Stream raw references for a symbol into a channel.
///
/// Declarations are enumerated before the finder runs; no other ordering
/// is promised. An absent symbol yields an empty sequence. A document
/// that fails to parse, or a finder fault for one document, is skipped
/// with a warning rather than aborting the sequence. Cancellation (or a
/// dropped receiver) stops production promptly; consumers must discard
/// whatever was already received.
pub fn stream_references(
    symbol: Option<&Symbol>,
    documents: &DocumentSet,
    token: &CancellationToken,
    sink: Sender<RawReference>,
) -> Result<()> {
    let Some(symbol) = symbol else {
        return Ok(());
    };

    // Declaration locations, filtered to the document set.
    for declaration in &symbol.declarations {
        if token.is_cancelled() {
            return Ok(());
        }
        let Some(document) = documents.get(&declaration.file) else {
            continue;
        };

        let rope = Rope::from_str(document.text());
        let start_char = rope.byte_to_char(declaration.span.start);
        let line = rope.char_to_line(start_char);
        let line_byte = rope.line_to_byte(line);

        let raw = RawReference {
            symbol: symbol.name.clone(),
            file: declaration.file.clone(),
            span: declaration.span,
            line: line + 1,
            column: declaration.span.start - line_byte,
            tag: RawTag::Declaration,
        };
        if sink.send(raw).is_err() {
            return Ok(());
        }
    }

    // Usage sites from the reference finder, one document at a time.
    for document in documents.iter() {
        if token.is_cancelled() {
            return Ok(());
        }

        let snapshot = match SyntaxSnapshot::parse(document) {
            Ok(s) => s,
            Err(e) => {
                log::warn!(
                    "skipping {} during reference search: {}",
                    document.path().display(),
                    e
                );
                continue;
            }
        };

        let occurrences = match finder::find_occurrences(&snapshot, symbol) {
            Ok(o) => o,
            Err(e) => {
                log::warn!(
                    "reference finder failed for {}: {}",
                    document.path().display(),
                    e
                );
                continue;
            }
        };

        for occurrence in occurrences {
            if token.is_cancelled() {
                return Ok(());
            }
            if sink.send(occurrence).is_err() {
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Collect all raw references for a symbol into a vector.
///
/// A cancelled cycle yields an empty vector, never a partial one.
pub fn collect_references(
    symbol: Option<&Symbol>,
    documents: &DocumentSet,
    token: &CancellationToken,
) -> Result<Vec<RawReference>> {
    let (sink, source) = crossbeam_channel::unbounded();
    stream_references(symbol, documents, token, sink)?;

    if token.is_cancelled() {
        return Ok(Vec::new());
    }
    Ok(source.try_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::symbol::{resolve_symbol_at, ResolvedSymbol};
    use crate::syntax::Language;
    use std::path::Path;

    fn resolve(set: &DocumentSet, path: &str, offset: usize) -> ResolvedSymbol {
        let document = set.get(Path::new(path)).unwrap();
        let snapshot = SyntaxSnapshot::parse(document).unwrap();
        resolve_symbol_at(document, &snapshot, offset)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_declarations_come_first() {
        let text = "int main() { int x = 0; x = 5; return x; }";
        let set = DocumentSet::from_documents(vec![Document::new("t.c", text, Language::C)]);
        let resolved = resolve(&set, "t.c", text.rfind('x').unwrap());

        let token = CancellationToken::new();
        let raw = collect_references(Some(&resolved.symbol), &set, &token).unwrap();

        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].tag, RawTag::Declaration);
        assert!(raw[1..].iter().all(|r| r.tag == RawTag::Unclassified));
    }

    #[test]
    fn test_one_declaration_reference_per_declaration_site() {
        let text = "int x;\nint main() { x = 1; }";
        let set = DocumentSet::from_documents(vec![Document::new("t.c", text, Language::C)]);
        let resolved = resolve(&set, "t.c", text.find('x').unwrap());

        let token = CancellationToken::new();
        let raw = collect_references(Some(&resolved.symbol), &set, &token).unwrap();

        let declarations: Vec<_> = raw.iter().filter(|r| r.tag == RawTag::Declaration).collect();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].span, Span::new(4, 5));
        assert_eq!(declarations[0].line, 1);
    }

    #[test]
    fn test_absent_symbol_yields_empty() {
        let set = DocumentSet::from_documents(vec![Document::new(
            "t.c",
            "int main() { return 0; }",
            Language::C,
        )]);
        let token = CancellationToken::new();
        let raw = collect_references(None, &set, &token).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_cancellation_yields_empty_not_partial() {
        let text = "int main() { int x = 0; x = 5; return x; }";
        let set = DocumentSet::from_documents(vec![Document::new("t.c", text, Language::C)]);
        let resolved = resolve(&set, "t.c", text.rfind('x').unwrap());

        let token = CancellationToken::new();
        token.cancel();
        let raw = collect_references(Some(&resolved.symbol), &set, &token).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_declarations_outside_document_set_are_skipped() {
        let text = "int main() { int x = 0; return x; }";
        let set = DocumentSet::from_documents(vec![Document::new("t.c", text, Language::C)]);
        let mut resolved = resolve(&set, "t.c", text.rfind('x').unwrap());

        // Pretend the symbol also has a declaration in a file we are not
        // searching; the locator must not report it.
        resolved
            .symbol
            .declarations
            .push(crate::symbol::Declaration {
                file: PathBuf::from("other.c"),
                span: Span::new(0, 1),
            });

        let token = CancellationToken::new();
        let raw = collect_references(Some(&resolved.symbol), &set, &token).unwrap();
        let declarations: Vec<_> = raw.iter().filter(|r| r.tag == RawTag::Declaration).collect();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].file, PathBuf::from("t.c"));
    }
}
