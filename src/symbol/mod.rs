//! Symbol resolution at a caret position.
//!
//! Resolution here is syntactic: the identifier under the caret names the
//! symbol, and declaration sites are identifier occurrences sitting in a
//! declaration-shaped parent (function names, let/var declarators,
//! parameters, type names). There is no semantic model; shadowing and
//! cross-file aliasing are out of scope for this kernel.

use crate::document::Document;
use crate::error::Result;
use crate::span::Span;
use crate::syntax::{is_identifier_kind, Language, SyntaxSnapshot};
use std::path::PathBuf;
use tree_sitter::Node;

/// A declaration location of a symbol: file plus span of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// File containing the declaration.
    pub file: PathBuf,
    /// Span of the declared name.
    pub span: Span,
}

/// A resolved symbol: name plus its known declaration locations.
///
/// Immutable once resolved. The declaration list may be empty when the
/// caret sits on a usage of a symbol declared outside the document set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name as spelled in source.
    pub name: String,
    /// Language the symbol was resolved in.
    pub language: Language,
    /// Declaration locations of the symbol.
    pub declarations: Vec<Declaration>,
}

/// Result of resolving the symbol under a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// The resolved symbol.
    pub symbol: Symbol,
    /// Span of the identifier under the caret.
    pub caret_span: Span,
    /// Whether the caret sits on one of the symbol's declarations.
    pub at_declaration: bool,
}

/// Parent node kinds whose name/declarator/pattern field declares a symbol.
const DECLARATION_PARENT_KINDS: &[&str] = &[
    // Rust
    "function_item",
    "struct_item",
    "enum_item",
    "trait_item",
    "const_item",
    "static_item",
    "mod_item",
    "type_item",
    "let_declaration",
    "parameter",
    // C / C++
    "function_declarator",
    "init_declarator",
    "pointer_declarator",
    "array_declarator",
    "parameter_declaration",
    "declaration",
    "field_declaration",
    // Java
    "variable_declarator",
    "formal_parameter",
    "method_declaration",
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    // JavaScript / TypeScript
    "function_declaration",
    "method_definition",
    "required_parameter",
    "optional_parameter",
    // Python
    "function_definition",
    "class_definition",
    "default_parameter",
    "typed_parameter",
];

/// Fields that carry the declared name inside a declaration parent.
const DECLARED_NAME_FIELDS: &[&str] = &["name", "declarator", "pattern"];

/// Parameter containers that hold bare identifier children (Python and
/// JavaScript parameter lists, Rust closure parameters).
const PARAMETER_CONTAINER_KINDS: &[&str] = &["parameters", "formal_parameters", "closure_parameters"];

/// Resolve the symbol at a byte offset in a document.
///
/// Returns `Ok(None)` when the caret is not on an identifier; that is an
/// ordinary no-resolution outcome, never an error.
pub fn resolve_symbol_at(
    document: &Document,
    snapshot: &SyntaxSnapshot,
    offset: usize,
) -> Result<Option<ResolvedSymbol>> {
    let node = match snapshot.node_at_offset(offset) {
        Some(n) if is_identifier_kind(n.kind()) => n,
        _ => return Ok(None),
    };

    let name = snapshot.node_text(node)?.to_string();
    let caret_span = Span::new(node.start_byte(), node.end_byte());

    let mut declarations = Vec::new();
    collect_declarations(snapshot.root(), snapshot, &name, &mut declarations)?;
    let declarations: Vec<Declaration> = declarations
        .into_iter()
        .map(|span| Declaration {
            file: snapshot.path().to_path_buf(),
            span,
        })
        .collect();

    let at_declaration = declarations.iter().any(|d| d.span == caret_span);

    log::debug!(
        "resolved '{}' at {} with {} declaration(s) in {}",
        name,
        caret_span,
        declarations.len(),
        document.path().display()
    );

    Ok(Some(ResolvedSymbol {
        symbol: Symbol {
            name,
            language: document.language(),
            declarations,
        },
        caret_span,
        at_declaration,
    }))
}

/// Whether an identifier node sits in a declaration-shaped parent.
pub(crate) fn is_declaration_site(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    // Bare identifier directly inside a parameter list.
    if PARAMETER_CONTAINER_KINDS.contains(&parent.kind()) {
        return true;
    }

    if !DECLARATION_PARENT_KINDS.contains(&parent.kind()) {
        return false;
    }

    DECLARED_NAME_FIELDS
        .iter()
        .any(|field| parent.child_by_field_name(field) == Some(node))
}

/// Recursively collect declaration spans for a name.
fn collect_declarations(
    node: Node<'_>,
    snapshot: &SyntaxSnapshot,
    name: &str,
    declarations: &mut Vec<Span>,
) -> Result<()> {
    if is_identifier_kind(node.kind()) && is_declaration_site(node) {
        let text = snapshot.node_text(node)?;
        if text == name {
            declarations.push(Span::new(node.start_byte(), node.end_byte()));
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_declarations(child, snapshot, name, declarations)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str, language: Language, extension: &str, offset: usize) -> Option<ResolvedSymbol> {
        let doc = Document::new(format!("t.{}", extension), text, language);
        let snapshot = SyntaxSnapshot::parse(&doc).unwrap();
        resolve_symbol_at(&doc, &snapshot, offset).unwrap()
    }

    #[test]
    fn test_caret_off_identifier_yields_none() {
        let text = "int main() { return 0; }";
        // Offset of '{'
        let offset = text.find('{').unwrap();
        assert!(resolve(text, Language::C, "c", offset).is_none());
    }

    #[test]
    fn test_resolve_local_variable() {
        let text = "int main() { int counter = 0; counter = 5; return counter; }";
        let usage = text.rfind("counter").unwrap();
        let resolved = resolve(text, Language::C, "c", usage).unwrap();

        assert_eq!(resolved.symbol.name, "counter");
        assert_eq!(resolved.symbol.declarations.len(), 1);
        let declaration = text.find("counter").unwrap();
        assert_eq!(
            resolved.symbol.declarations[0].span,
            Span::new(declaration, declaration + "counter".len())
        );
        assert!(!resolved.at_declaration);
    }

    #[test]
    fn test_caret_on_declaration() {
        let text = "fn helper() {}\nfn main() { helper(); }";
        let decl = text.find("helper").unwrap();
        let resolved = resolve(text, Language::Rust, "rs", decl).unwrap();

        assert_eq!(resolved.symbol.name, "helper");
        assert!(resolved.at_declaration);
        assert_eq!(resolved.symbol.declarations.len(), 1);
    }

    #[test]
    fn test_parameter_is_a_declaration() {
        let text = "def f(count):\n    return count\n";
        let usage = text.rfind("count").unwrap();
        let resolved = resolve(text, Language::Python, "py", usage).unwrap();

        assert_eq!(resolved.symbol.declarations.len(), 1);
        let param = text.find("count").unwrap();
        assert_eq!(
            resolved.symbol.declarations[0].span,
            Span::new(param, param + "count".len())
        );
    }

    #[test]
    fn test_usage_of_undeclared_symbol_has_no_declarations() {
        let text = "int main() { return external_thing; }";
        let usage = text.find("external_thing").unwrap();
        let resolved = resolve(text, Language::C, "c", usage).unwrap();
        assert!(resolved.symbol.declarations.is_empty());
    }
}
