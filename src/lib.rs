//! Halo: usage-aware symbol reference classification kernel.
//!
//! This library locates references to a symbol across a fixed document set
//! and classifies each occurrence as a declaration, a read, a write, or a
//! combined read-write access, based purely on syntactic context.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cancel;
pub mod classify;
pub mod cli;
pub mod document;
pub mod error;
pub mod highlight;
pub mod locate;
pub mod span;
pub mod symbol;
pub mod syntax;

/// Re-export common error types for convenience.
pub use error::{HaloError, Result};

/// Re-export the core classification types for convenience.
pub use classify::UsageKind;
pub use span::Span;

/// Halo version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
