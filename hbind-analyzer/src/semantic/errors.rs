//! Semantic analysis error definitions
//!
//! Errors raised while resolving declarations against the type registry
//! and assembling the symbol table.

use hbind_common::{AnalyzerError, SourceLocation};

/// Semantic analysis errors
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// A type name with no builtin, typedef, struct, or enum definition
    /// at the point of reference. Declaration order matters: a name
    /// defined later in the unit does not rescue an earlier reference.
    UnresolvedType {
        type_name: String,
        referenced_by: String,
        location: SourceLocation,
    },
    /// The typedef alias chain revisited a name already walked.
    AliasCycle {
        type_name: String,
        location: SourceLocation,
    },
    /// The same identifier defined twice with different meanings.
    ConflictingDefinition {
        name: String,
        first: SourceLocation,
        second: SourceLocation,
    },
}

impl From<SemanticError> for AnalyzerError {
    fn from(err: SemanticError) -> Self {
        match err {
            SemanticError::UnresolvedType {
                type_name,
                referenced_by,
                location,
            } => AnalyzerError::UnresolvedType {
                type_name,
                referenced_by,
                location,
            },
            SemanticError::AliasCycle {
                type_name,
                location,
            } => AnalyzerError::Cycle {
                type_name,
                location,
            },
            SemanticError::ConflictingDefinition {
                name,
                first,
                second,
            } => AnalyzerError::Conflict {
                identifier: name,
                first,
                second,
            },
        }
    }
}
