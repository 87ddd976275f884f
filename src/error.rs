//! Halo error types.
//!
//! All errors are typed and provide root cause information. Note that
//! neither "caret not on a symbol" nor "cycle cancelled" is an error:
//! both are ordinary outcomes surfaced through `Option` / `CycleOutcome`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Halo operations.
#[derive(Error, Debug)]
pub enum HaloError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter parsing error.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// File extension does not map to a supported syntax backend.
    #[error("Unknown language for {path}")]
    UnknownLanguage {
        /// The path whose extension could not be mapped.
        path: PathBuf,
    },

    /// A document was requested that is not part of the document set.
    #[error("Document not in document set: {path}")]
    DocumentNotFound {
        /// The missing document path.
        path: PathBuf,
    },

    /// Invalid byte span.
    #[error("Invalid span ({start}, {end}) in {file}")]
    InvalidSpan {
        /// The file containing the invalid span.
        file: PathBuf,
        /// Start byte offset.
        start: usize,
        /// End byte offset.
        end: usize,
    },

    /// A syntax snapshot no longer matches the document text it came from.
    ///
    /// Classification results are only valid against the snapshot they
    /// were computed from; this error rejects the stale pairing.
    #[error("Stale syntax snapshot for {file}")]
    StaleSnapshot {
        /// The file whose content diverged from the snapshot.
        file: PathBuf,
    },

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for HaloError {
    fn from(err: std::io::Error) -> Self {
        HaloError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl HaloError {
    /// Stable kind identifier for structured CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            HaloError::Io { .. } => "Io",
            HaloError::Parse { .. } => "Parse",
            HaloError::UnknownLanguage { .. } => "UnknownLanguage",
            HaloError::DocumentNotFound { .. } => "DocumentNotFound",
            HaloError::InvalidSpan { .. } => "InvalidSpan",
            HaloError::StaleSnapshot { .. } => "StaleSnapshot",
            HaloError::Utf8(_) => "Utf8",
            HaloError::Other(_) => "Other",
        }
    }

    /// File path context, when the error carries one.
    pub fn file_path(&self) -> Option<&std::path::Path> {
        match self {
            HaloError::Io { path, .. }
            | HaloError::UnknownLanguage { path }
            | HaloError::DocumentNotFound { path } => Some(path),
            HaloError::Parse { file, .. }
            | HaloError::InvalidSpan { file, .. }
            | HaloError::StaleSnapshot { file } => Some(file),
            HaloError::Utf8(_) | HaloError::Other(_) => None,
        }
    }
}

/// Result type alias for Halo operations.
pub type Result<T> = std::result::Result<T, HaloError>;
