//! Mapping from tree-sitter nodes to classification shapes.
//!
//! Each supported grammar spells the shapes the classifier cares about
//! with its own node kinds; this module folds them all into the closed
//! `UsageContext` variant. Grammars that lack a shape (Rust and Python
//! have no `++`) simply never produce it.

use crate::classify::{ArgumentMode, ParentShape, UsageContext};
use crate::span::Span;
use crate::syntax::SyntaxSnapshot;
use tree_sitter::Node;

/// Member/field/attribute access nodes, one per grammar family.
const MEMBER_ACCESS_KINDS: &[&str] = &[
    "field_expression",   // C, C++, Rust
    "field_access",       // Java
    "member_expression",  // JavaScript, TypeScript
    "attribute",          // Python
    "scoped_identifier",  // Rust/Java qualified names
];

/// Pre/post increment and decrement nodes.
const INCREMENT_DECREMENT_KINDS: &[&str] = &[
    "update_expression", // C, C++, Java, JavaScript, TypeScript
];

/// Assignment nodes, simple and compound.
///
/// Compound forms are listed on purpose: a compound-assignment target is
/// classified as a plain Write, not ReadWrite.
const ASSIGNMENT_KINDS: &[&str] = &[
    "assignment_expression",           // C, C++, Java, JavaScript, TypeScript, Rust
    "augmented_assignment_expression", // JavaScript, TypeScript
    "assignment",                      // Python
    "augmented_assignment",            // Python
    "compound_assignment_expr",        // Rust
];

/// Call-site argument list nodes.
const ARGUMENT_LIST_KINDS: &[&str] = &[
    "argument_list", // C, C++, Java, Python
    "arguments",     // JavaScript, TypeScript, Rust
];

/// Extract the classification context for the reference at `span`.
///
/// Returns None when no node exactly covers the span or the covering
/// node has no parent; callers treat both as "no special context" and
/// default to Read.
pub fn usage_context(snapshot: &SyntaxSnapshot, span: Span) -> Option<UsageContext> {
    let node = snapshot.node_covering_span(span)?;
    let parent = node.parent()?;

    // Qualified references carry their mutation context on the outer
    // expression, not the member-access node itself. Unwrap exactly one
    // level; nested accesses stay put.
    let effective = if MEMBER_ACCESS_KINDS.contains(&parent.kind()) {
        parent.parent()
    } else {
        Some(parent)
    };

    let effective_parent = match effective {
        Some(p) if INCREMENT_DECREMENT_KINDS.contains(&p.kind()) => {
            ParentShape::IncrementDecrement
        }
        Some(p) if ASSIGNMENT_KINDS.contains(&p.kind()) => ParentShape::Assignment {
            in_target: assignment_target_contains(p, span),
        },
        _ => ParentShape::Other,
    };

    Some(UsageContext {
        effective_parent,
        argument_mode: argument_mode(parent),
    })
}

/// Whether the assignment's left-hand side contains the reference span.
fn assignment_target_contains(assignment: Node<'_>, span: Span) -> bool {
    assignment
        .child_by_field_name("left")
        .map(|left| Span::new(left.start_byte(), left.end_byte()).contains_span(span))
        .unwrap_or(false)
}

/// Derive the argument passing mode from the immediate parent chain.
///
/// The mode check deliberately looks at the direct parent, not the
/// member-access-unwrapped one: only the reference itself being an
/// argument counts, matching the classifier's contract.
fn argument_mode(parent: Node<'_>) -> Option<ArgumentMode> {
    let parent_kind = parent.kind();

    // Plain argument: identifier directly inside the argument list.
    if ARGUMENT_LIST_KINDS.contains(&parent_kind) {
        return Some(ArgumentMode::Value);
    }

    let grandparent = parent.parent()?;
    if !ARGUMENT_LIST_KINDS.contains(&grandparent.kind()) {
        return None;
    }

    match parent_kind {
        // C/C++ address-of at the call site: foo(&x). The same node kind
        // covers dereference, so require the `&` operator token.
        "pointer_expression" => {
            let operator = parent.child(0)?;
            if operator.kind() == "&" {
                Some(ArgumentMode::MutableRef)
            } else {
                None
            }
        }
        // Rust borrows at the call site: foo(&mut x) mutates, foo(&x)
        // only reads.
        "reference_expression" => {
            let mut cursor = parent.walk();
            let mutable = parent
                .children(&mut cursor)
                .any(|c| c.kind() == "mutable_specifier");
            if mutable {
                Some(ArgumentMode::MutableRef)
            } else {
                Some(ArgumentMode::Value)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::syntax::Language;

    fn snapshot(text: &str, language: Language) -> SyntaxSnapshot {
        let extension = match language {
            Language::C => "c",
            Language::Rust => "rs",
            Language::Python => "py",
            Language::JavaScript => "js",
            _ => "txt",
        };
        let doc = Document::new(format!("t.{}", extension), text, language);
        SyntaxSnapshot::parse(&doc).unwrap()
    }

    fn span_of(text: &str, needle: &str, occurrence: usize) -> Span {
        let mut from = 0;
        for _ in 0..occurrence {
            from = text[from..].find(needle).map(|i| from + i + 1).unwrap();
        }
        let start = from + text[from..].find(needle).unwrap();
        Span::new(start, start + needle.len())
    }

    #[test]
    fn test_update_expression_shape() {
        let text = "int main() { int x = 0; x++; }";
        let snap = snapshot(text, Language::C);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(ctx.effective_parent, ParentShape::IncrementDecrement);
    }

    #[test]
    fn test_assignment_target_shape() {
        let text = "int main() { int x; x = 5; }";
        let snap = snapshot(text, Language::C);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(
            ctx.effective_parent,
            ParentShape::Assignment { in_target: true }
        );
    }

    #[test]
    fn test_member_access_unwraps_one_level() {
        let text = "void f(struct S s) { s.field = 1; }";
        let snap = snapshot(text, Language::C);
        let span = span_of(text, "field", 0);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(
            ctx.effective_parent,
            ParentShape::Assignment { in_target: true }
        );
    }

    #[test]
    fn test_address_of_argument_is_mutable_ref() {
        let text = "void f() { int x; g(&x); }";
        let snap = snapshot(text, Language::C);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(ctx.argument_mode, Some(ArgumentMode::MutableRef));
    }

    #[test]
    fn test_dereference_argument_is_not_a_modifier() {
        let text = "void f() { int *x; g(*x); }";
        let snap = snapshot(text, Language::C);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(ctx.argument_mode, None);
    }

    #[test]
    fn test_rust_mut_borrow_argument() {
        let text = "fn f() { let mut x = 0; g(&mut x); }";
        let snap = snapshot(text, Language::Rust);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(ctx.argument_mode, Some(ArgumentMode::MutableRef));
    }

    #[test]
    fn test_rust_shared_borrow_argument_has_no_modifier() {
        let text = "fn f() { let x = 0; g(&x); }";
        let snap = snapshot(text, Language::Rust);
        let span = span_of(text, "x", 1);
        let ctx = usage_context(&snap, span).unwrap();
        assert_eq!(ctx.argument_mode, Some(ArgumentMode::Value));
    }

    #[test]
    fn test_misaligned_span_yields_no_context() {
        let text = "int main() { int x; x = 5; }";
        let snap = snapshot(text, Language::C);
        // Straddles "x " - no node covers this exactly.
        let span = span_of(text, "x", 1);
        assert!(usage_context(&snap, Span::new(span.start, span.end + 1)).is_none());
    }
}
