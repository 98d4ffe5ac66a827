//! Error handling for the header binding analyzer
//!
//! One variant per failure taxonomy: malformed tokens, malformed
//! declaration shapes, typedef alias cycles, conflicting redefinitions,
//! and references to unknown type names. The analyzer never defaults a
//! type it cannot resolve; every such case becomes one of these errors.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Analyzer error type surfaced to the external caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("Lexical error at {location}: {message}")]
    Lex {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    Parse {
        location: SourceLocation,
        message: String,
    },

    #[error("Typedef cycle through '{type_name}' at {location}")]
    Cycle {
        type_name: String,
        location: SourceLocation,
    },

    #[error("Conflicting definitions of '{identifier}': first at {first}, again at {second}")]
    Conflict {
        identifier: String,
        first: SourceLocation,
        second: SourceLocation,
    },

    #[error("Unknown type name '{type_name}' referenced by '{referenced_by}' at {location}")]
    UnresolvedType {
        type_name: String,
        referenced_by: String,
        location: SourceLocation,
    },

    #[error("Internal analyzer error: {message}")]
    Internal { message: String },
}

impl AnalyzerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        AnalyzerError::Lex { location, message }
    }

    /// Create a parse error
    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        AnalyzerError::Parse { location, message }
    }

    /// Location the error points at, where it has one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            AnalyzerError::Lex { location, .. }
            | AnalyzerError::Parse { location, .. }
            | AnalyzerError::Cycle { location, .. }
            | AnalyzerError::UnresolvedType { location, .. } => Some(location),
            AnalyzerError::Conflict { second, .. } => Some(second),
            AnalyzerError::Internal { .. } => None,
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for AnalyzerError {
    fn from(message: String) -> Self {
        AnalyzerError::Internal { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_location() {
        let err = AnalyzerError::lexer_error(
            "Unexpected character: @".to_string(),
            SourceLocation::new("simple.h", 3, 7, 21),
        );
        assert_eq!(
            err.to_string(),
            "Lexical error at simple.h:3:7: Unexpected character: @"
        );
        assert_eq!(err.location().unwrap().offset, 21);
    }

    #[test]
    fn test_conflict_names_both_locations() {
        let err = AnalyzerError::Conflict {
            identifier: "func".to_string(),
            first: SourceLocation::new("a.h", 1, 1, 0),
            second: SourceLocation::new("b.h", 9, 1, 120),
        };
        let text = err.to_string();
        assert!(text.contains("a.h:1:1"));
        assert!(text.contains("b.h:9:1"));
    }
}
