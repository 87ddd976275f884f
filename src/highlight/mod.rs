//! Resolve-cycle driver.
//!
//! One logical cycle per caret move: resolve the symbol under the caret,
//! locate its references, classify each one as it is produced. A new
//! trigger cancels the in-flight cycle's token, and `apply` guarantees a
//! stale cycle's results never overwrite a newer cycle's state. Every
//! failure mode degrades to "no highlights", never a user-visible error.

use crate::cancel::CancellationToken;
use crate::classify::{classify_span, UsageKind};
use crate::document::{Document, DocumentSet};
use crate::error::{HaloError, Result};
use crate::locate::{stream_references, RawTag, Reference};
use crate::symbol::resolve_symbol_at;
use crate::syntax::SyntaxSnapshot;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Classified references produced by one resolve cycle.
#[derive(Debug, Clone)]
pub struct HighlightSet {
    /// Monotonic cycle generation; newer cycles have larger values.
    pub generation: u64,
    /// The classified references.
    pub references: Vec<Reference>,
}

/// Outcome of one resolve cycle.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// The cycle completed with classified references.
    Highlights(HighlightSet),
    /// The caret was not on a resolvable symbol; show nothing.
    NoSymbol,
    /// The cycle was cancelled mid-flight; partial results discarded.
    Abandoned,
}

/// Drives resolve cycles and enforces the "latest cycle wins" rule.
#[derive(Default)]
pub struct HighlightEngine {
    /// Generation of the most recently triggered cycle.
    generation: u64,
    /// Generation of the most recently applied highlight set.
    applied_generation: u64,
    /// Token of the in-flight cycle, if any.
    active: Option<CancellationToken>,
    /// Parsed snapshots cached across cycles, invalidated by content
    /// hash: an edited document is always reparsed, never classified
    /// against a stale tree.
    snapshots: HashMap<PathBuf, SyntaxSnapshot>,
}

impl HighlightEngine {
    /// Create a new engine with no cycle history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight cycle, if any.
    pub fn cancel_active(&mut self) {
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }
    }

    /// Trigger a new resolve cycle at a caret position.
    ///
    /// Cancels any in-flight cycle first. `file` must be a member of the
    /// document set.
    pub fn trigger(
        &mut self,
        documents: &DocumentSet,
        file: &Path,
        offset: usize,
    ) -> Result<CycleOutcome> {
        self.trigger_with_token(documents, file, offset, CancellationToken::new())
    }

    /// Trigger a cycle with a caller-supplied token, so hosts can cancel
    /// from another thread while the cycle runs.
    pub fn trigger_with_token(
        &mut self,
        documents: &DocumentSet,
        file: &Path,
        offset: usize,
        token: CancellationToken,
    ) -> Result<CycleOutcome> {
        self.cancel_active();
        self.active = Some(token.clone());

        self.generation += 1;
        let generation = self.generation;
        log::debug!(
            "cycle {} triggered at {}:{}",
            generation,
            file.display(),
            offset
        );

        let outcome = self.run_cycle(documents, file, offset, &token, generation);
        self.active = None;
        outcome
    }

    /// Apply a cycle's results, rejecting stale generations.
    ///
    /// Returns false when the set belongs to a cycle older than one
    /// already applied; callers must then discard it.
    pub fn apply(&mut self, set: &HighlightSet) -> bool {
        if set.generation < self.applied_generation {
            return false;
        }
        self.applied_generation = set.generation;
        true
    }

    /// Run one resolve -> locate -> classify cycle.
    fn run_cycle(
        &mut self,
        documents: &DocumentSet,
        file: &Path,
        offset: usize,
        token: &CancellationToken,
        generation: u64,
    ) -> Result<CycleOutcome> {
        let document = documents
            .get(file)
            .ok_or_else(|| HaloError::DocumentNotFound {
                path: file.to_path_buf(),
            })?;

        let snapshot = snapshot_for(&mut self.snapshots, document)?;
        let resolved = resolve_symbol_at(document, snapshot, offset)?;
        let Some(resolved) = resolved else {
            return Ok(CycleOutcome::NoSymbol);
        };
        if token.is_cancelled() {
            return Ok(CycleOutcome::Abandoned);
        }

        // Locator and classifier interleave: the producer streams raw
        // references through a channel while this thread classifies each
        // one as it arrives.
        let (sink, source) = crossbeam_channel::unbounded();
        let symbol = &resolved.symbol;
        let snapshots = &mut self.snapshots;

        let references = std::thread::scope(|scope| -> Result<Vec<Reference>> {
            let producer =
                scope.spawn(|| stream_references(Some(symbol), documents, token, sink));

            let mut references = Vec::new();
            for raw in source.iter() {
                if token.is_cancelled() {
                    break;
                }
                let kind = match raw.tag {
                    RawTag::Declaration => UsageKind::Declaration,
                    RawTag::Unclassified => match documents.get(&raw.file) {
                        Some(doc) => match snapshot_for(snapshots, doc) {
                            Ok(snap) => classify_span(snap, raw.span),
                            // Missing syntactic context degrades to Read.
                            Err(e) => {
                                log::warn!("classification fell back to Read: {}", e);
                                UsageKind::Read
                            }
                        },
                        None => UsageKind::Read,
                    },
                };
                references.push(raw.into_reference(kind));
            }

            producer
                .join()
                .map_err(|_| HaloError::Other("reference producer panicked".to_string()))??;
            Ok(references)
        })?;

        if token.is_cancelled() {
            return Ok(CycleOutcome::Abandoned);
        }

        log::debug!(
            "cycle {} classified {} reference(s) for '{}'",
            generation,
            references.len(),
            resolved.symbol.name
        );
        Ok(CycleOutcome::Highlights(HighlightSet {
            generation,
            references,
        }))
    }
}

/// Fetch a cached snapshot for a document, reparsing when the document
/// text no longer matches the cached tree.
fn snapshot_for<'a>(
    snapshots: &'a mut HashMap<PathBuf, SyntaxSnapshot>,
    document: &Document,
) -> Result<&'a SyntaxSnapshot> {
    let fresh = snapshots
        .get(document.path())
        .is_some_and(|snap| snap.verify(document).is_ok());

    if !fresh {
        let snapshot = SyntaxSnapshot::parse(document)?;
        snapshots.insert(document.path().to_path_buf(), snapshot);
    }

    snapshots
        .get(document.path())
        .ok_or_else(|| HaloError::Other("snapshot cache miss after insert".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Language;

    fn single_doc_set(text: &str) -> DocumentSet {
        DocumentSet::from_documents(vec![Document::new("t.c", text, Language::C)])
    }

    #[test]
    fn test_no_symbol_outcome() {
        let text = "int main() { return 0; }";
        let set = single_doc_set(text);
        let mut engine = HighlightEngine::new();
        let outcome = engine
            .trigger(&set, Path::new("t.c"), text.find('{').unwrap())
            .unwrap();
        assert!(matches!(outcome, CycleOutcome::NoSymbol));
    }

    #[test]
    fn test_full_cycle_classifies_usages() {
        let text = "int main() { int x = 0; x = 5; int y = x; x++; }";
        let set = single_doc_set(text);
        let mut engine = HighlightEngine::new();
        let outcome = engine
            .trigger(&set, Path::new("t.c"), text.rfind("x++").unwrap())
            .unwrap();

        let CycleOutcome::Highlights(highlights) = outcome else {
            panic!("expected highlights");
        };
        let kinds: Vec<UsageKind> = highlights.references.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                UsageKind::Declaration, // int x = 0
                UsageKind::Write,       // x = 5
                UsageKind::Read,        // int y = x
                UsageKind::ReadWrite,   // x++
            ]
        );
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let text = "int main() { int x = 0; x = 5; }";
        let set = single_doc_set(text);
        let mut engine = HighlightEngine::new();

        let first = engine
            .trigger(&set, Path::new("t.c"), text.rfind('x').unwrap())
            .unwrap();
        let second = engine
            .trigger(&set, Path::new("t.c"), text.rfind('x').unwrap())
            .unwrap();

        let (CycleOutcome::Highlights(first), CycleOutcome::Highlights(second)) = (first, second)
        else {
            panic!("expected highlights");
        };

        assert!(engine.apply(&second));
        assert!(!engine.apply(&first), "older cycle must not overwrite newer state");
    }

    #[test]
    fn test_trigger_cancels_previous_token() {
        let text = "int main() { int x = 0; }";
        let set = single_doc_set(text);
        let mut engine = HighlightEngine::new();

        // Simulate an in-flight cycle by planting a token.
        let stale = CancellationToken::new();
        engine.active = Some(stale.clone());

        let _ = engine
            .trigger(&set, Path::new("t.c"), text.rfind('x').unwrap())
            .unwrap();
        assert!(stale.is_cancelled());
    }

    #[test]
    fn test_pre_cancelled_cycle_is_abandoned() {
        let text = "int main() { int x = 0; x = 5; }";
        let set = single_doc_set(text);
        let mut engine = HighlightEngine::new();

        let token = CancellationToken::new();
        token.cancel();
        let outcome = engine
            .trigger_with_token(&set, Path::new("t.c"), text.rfind('x').unwrap(), token)
            .unwrap();
        assert!(matches!(outcome, CycleOutcome::Abandoned));
    }

    #[test]
    fn test_unknown_document_is_an_error() {
        let set = single_doc_set("int x;");
        let mut engine = HighlightEngine::new();
        let err = engine.trigger(&set, Path::new("missing.c"), 0).unwrap_err();
        assert!(matches!(err, HaloError::DocumentNotFound { .. }));
    }
}
