//! Halo CLI binary
//!
//! This is the main entry point for the halo command-line interface.
//! The CLI is a thin adapter over the library APIs - NO logic is
//! implemented here.

use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = halo::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        halo::cli::Commands::Usages { file, offset, json } => {
            execute_usages(&file, offset, json)
        }
        halo::cli::Commands::Classify { file, start, end } => execute_classify(&file, start, end),
    };

    // Handle result
    match result {
        Ok(msg) => {
            println!("{}", msg);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let payload = halo::cli::CliErrorPayload::from_error(&e);
            match serde_json::to_string(&payload) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", e),
            }
            ExitCode::from(1)
        }
    }
}

/// Execute the usages command.
///
/// This function is a thin adapter that:
/// 1. Reads the source file into a single-document set
/// 2. Triggers one resolve cycle at the caret offset
/// 3. Renders the classified references
fn execute_usages(file_path: &Path, offset: usize, json: bool) -> Result<String, halo::HaloError> {
    use halo::document::{Document, DocumentSet};
    use halo::highlight::{CycleOutcome, HighlightEngine};

    // Step 1: Read the document and build the search scope
    let document = Document::from_path(file_path)?;
    let documents = DocumentSet::from_documents(vec![document]);

    // Step 2: Run one resolve cycle
    let mut engine = HighlightEngine::new();
    let outcome = engine.trigger(&documents, file_path, offset)?;

    // Step 3: Render the outcome
    match outcome {
        CycleOutcome::Highlights(set) => {
            if json {
                let data = serde_json::to_value(&set.references)
                    .map_err(|e| halo::HaloError::Other(e.to_string()))?;
                let payload = halo::cli::CliSuccessPayload::with_data(
                    format!("{} reference(s)", set.references.len()),
                    data,
                );
                serde_json::to_string_pretty(&payload)
                    .map_err(|e| halo::HaloError::Other(e.to_string()))
            } else {
                let mut lines = Vec::new();
                for reference in &set.references {
                    lines.push(format!(
                        "{}:{}:{}: {} '{}' {}",
                        reference.file.display(),
                        reference.line,
                        reference.column,
                        reference.kind.as_str(),
                        reference.symbol,
                        reference.span,
                    ));
                }
                Ok(lines.join("\n"))
            }
        }
        CycleOutcome::NoSymbol => Ok(format!("No symbol at offset {}", offset)),
        CycleOutcome::Abandoned => Ok("Cycle abandoned".to_string()),
    }
}

/// Execute the classify command.
///
/// This function is a thin adapter that:
/// 1. Reads and parses the source file
/// 2. Classifies the given span against the fresh snapshot
fn execute_classify(file_path: &Path, start: usize, end: usize) -> Result<String, halo::HaloError> {
    use halo::classify::classify_span;
    use halo::document::Document;
    use halo::span::Span;
    use halo::syntax::SyntaxSnapshot;

    if end < start {
        return Err(halo::HaloError::InvalidSpan {
            file: file_path.to_path_buf(),
            start,
            end,
        });
    }

    // Step 1: Read and parse the document
    let document = Document::from_path(file_path)?;
    let snapshot = SyntaxSnapshot::parse(&document)?;
    snapshot.verify(&document)?;

    // Step 2: Classify the span
    let kind = classify_span(&snapshot, Span::new(start, end));

    Ok(format!(
        "{}: {} at [{}, {})",
        file_path.display(),
        kind.as_str(),
        start,
        end
    ))
}
