//! Usage classification.
//!
//! Classifies a single reference span by its syntactic context alone: no
//! symbol-table lookups, no cross-reference state. The context is a closed
//! tagged variant extracted from the syntax tree (`syntax::shape`), and
//! `classify` is a pure function over it, so classifying the same
//! (span, snapshot) pair twice always yields the same kind.

use crate::span::Span;
use crate::syntax::{shape, SyntaxSnapshot};
use serde::{Deserialize, Serialize};

/// How a reference uses its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    /// The reference is one of the symbol's own declaration sites.
    Declaration,
    /// The symbol's value is read.
    Read,
    /// The symbol's value is written.
    Write,
    /// The symbol's value is read and written in one expression.
    ReadWrite,
}

impl UsageKind {
    /// Convert the kind to a string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::Declaration => "declaration",
            UsageKind::Read => "read",
            UsageKind::Write => "write",
            UsageKind::ReadWrite => "read_write",
        }
    }
}

/// How a call argument is passed at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentMode {
    /// Plain by-value argument, no modifier.
    Value,
    /// Passed through a mutable-reference modifier (`&x` in C, `&mut x`
    /// in Rust): callee may read and write.
    MutableRef,
    /// Passed through an output-only modifier: callee writes, never reads.
    ///
    /// None of the bundled grammars spell such a modifier, but hosts that
    /// map their own syntax onto `UsageContext` can produce it.
    Out,
}

/// Shape of the syntactic parent relevant to classification, after
/// unwrapping at most one member-access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentShape {
    /// Pre/post increment or decrement expression.
    IncrementDecrement,
    /// Assignment expression (simple or compound).
    Assignment {
        /// Whether the reference span lies within the assignment's
        /// left-hand side.
        in_target: bool,
    },
    /// Any other parent shape.
    Other,
}

/// Syntactic context of one reference, as seen from its parent nodes.
///
/// `effective_parent` is the immediate parent re-targeted one level up
/// when the direct parent is a member access (`a.b` mutation context
/// lives on the outer expression). `argument_mode` is derived from the
/// *immediate* parent chain, independent of the re-targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageContext {
    /// Parent shape after the one-level member-access unwrap.
    pub effective_parent: ParentShape,
    /// Argument passing mode, when the reference is a call argument.
    pub argument_mode: Option<ArgumentMode>,
}

/// Classify a reference from its syntactic context.
///
/// Step ordering is significant: increment/decrement beats argument
/// modifiers, which beat assignment position; everything else is a Read.
/// A compound-assignment target (`x += 1`) is deliberately a plain Write,
/// matching the documented behavior this kernel preserves.
pub fn classify(context: &UsageContext) -> UsageKind {
    if context.effective_parent == ParentShape::IncrementDecrement {
        return UsageKind::ReadWrite;
    }

    match context.argument_mode {
        Some(ArgumentMode::MutableRef) => return UsageKind::ReadWrite,
        Some(ArgumentMode::Out) => return UsageKind::Write,
        Some(ArgumentMode::Value) | None => {}
    }

    if let ParentShape::Assignment { in_target: true } = context.effective_parent {
        return UsageKind::Write;
    }

    UsageKind::Read
}

/// Classify the reference at `span` against a syntax snapshot.
///
/// A span that cannot be mapped to a node (tree/text mismatch) defaults
/// to Read rather than failing the classification pass.
pub fn classify_span(snapshot: &SyntaxSnapshot, span: Span) -> UsageKind {
    match shape::usage_context(snapshot, span) {
        Some(context) => classify(&context),
        None => UsageKind::Read,
    }
}
