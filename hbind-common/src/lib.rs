//! Header Binding Analyzer - Common Types and Utilities
//!
//! This crate contains the shared location and error types used by the
//! analyzer pipeline and surfaced to its callers.

pub mod error;
pub mod source_loc;

pub use error::AnalyzerError;
pub use source_loc::{SourceLocation, SourceSpan};
