//! Parse error types for the declaration parser
//!
//! This module defines all error types that can occur while recognizing
//! declaration shapes.

use crate::lexer::Token;
use hbind_common::{AnalyzerError, SourceLocation};

/// Parse error types specific to the parser
#[derive(Debug, Clone)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: Token,
    },
    UnexpectedEndOfUnit {
        expected: String,
        location: SourceLocation,
    },
    InvalidTypeSpecifier {
        message: String,
        location: SourceLocation,
    },
    /// A construct the grammar deliberately does not model (unions,
    /// bitfields, function-pointer and array parameters, ...). The
    /// parser reports these rather than guessing a representation.
    Unsupported {
        construct: String,
        location: SourceLocation,
    },
}

impl From<ParseError> for AnalyzerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedToken { expected, found } => AnalyzerError::parse_error(
                format!("Expected {}, found {}", expected, found.kind),
                found.span.start,
            ),
            ParseError::UnexpectedEndOfUnit { expected, location } => AnalyzerError::parse_error(
                format!("Unexpected end of unit, expected {expected}"),
                location,
            ),
            ParseError::InvalidTypeSpecifier { message, location } => {
                AnalyzerError::parse_error(message, location)
            }
            ParseError::Unsupported {
                construct,
                location,
            } => AnalyzerError::parse_error(format!("{construct} are not supported"), location),
        }
    }
}
