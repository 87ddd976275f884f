//! Command-line interface for Halo.
//!
//! This module handles argument parsing and user interface only.
//! NO classification logic is performed here.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// Halo: usage-aware symbol reference classification kernel.
#[derive(Parser, Debug)]
#[command(name = "halo")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available Halo commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Resolve the symbol at a caret offset and classify every reference.
    Usages {
        /// Path to the source file.
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Caret byte offset of the symbol to highlight.
        #[arg(short, long)]
        offset: usize,

        /// Emit references as JSON instead of plain lines.
        #[arg(long)]
        json: bool,
    },

    /// Classify a single reference span.
    Classify {
        /// Path to the source file.
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Start byte offset of the reference span.
        #[arg(short, long)]
        start: usize,

        /// End byte offset (exclusive) of the reference span.
        #[arg(short, long)]
        end: usize,
    },
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload containing only the message.
    pub fn message_only(message: String) -> Self {
        Self {
            status: "ok",
            message,
            data: None,
        }
    }

    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (Parse, UnknownLanguage, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a HaloError instance.
    pub fn from_error(error: &crate::HaloError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
            },
        }
    }
}
