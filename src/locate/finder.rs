//! Reference-finder service.
//!
//! Walks a syntax snapshot collecting every identifier occurrence whose
//! text matches the symbol name, excluding the symbol's own declaration
//! spans (those are enumerated separately by the locator). Matching is
//! name-based, like the rest of the kernel: no semantic model.

use crate::error::Result;
use crate::locate::{RawReference, RawTag};
use crate::symbol::{is_declaration_site, Symbol};
use crate::syntax::{is_identifier_kind, SyntaxSnapshot};
use ropey::Rope;
use tree_sitter::Node;

/// Find all occurrences of a symbol's name in one snapshot.
///
/// Occurrences that are declaration sites are skipped; the locator
/// yields declarations from the symbol's own declaration list instead,
/// so nothing is reported twice.
pub(crate) fn find_occurrences(
    snapshot: &SyntaxSnapshot,
    symbol: &Symbol,
) -> Result<Vec<RawReference>> {
    let text = std::str::from_utf8(snapshot.source())?;
    let rope = Rope::from_str(text);

    let mut occurrences = Vec::new();
    collect_occurrences(snapshot.root(), snapshot, symbol, &rope, &mut occurrences)?;
    Ok(occurrences)
}

/// Recursively collect matching identifier occurrences.
fn collect_occurrences(
    node: Node<'_>,
    snapshot: &SyntaxSnapshot,
    symbol: &Symbol,
    rope: &Rope,
    occurrences: &mut Vec<RawReference>,
) -> Result<()> {
    if is_identifier_kind(node.kind()) {
        let text = snapshot.node_text(node)?;
        if text == symbol.name && !is_declaration_site(node) {
            let start = node.start_byte();
            let start_char = rope.byte_to_char(start);
            let line = rope.char_to_line(start_char);
            let line_byte = rope.line_to_byte(line);

            occurrences.push(RawReference {
                symbol: symbol.name.clone(),
                file: snapshot.path().to_path_buf(),
                span: crate::span::Span::new(start, node.end_byte()),
                line: line + 1,
                column: start - line_byte,
                tag: RawTag::Unclassified,
            });
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_occurrences(child, snapshot, symbol, rope, occurrences)?;
    }
    Ok(())
}
