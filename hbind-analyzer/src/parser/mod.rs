//! Recursive descent parser for header declarations
//!
//! Recognizes the declaration shapes a binding generator consumes:
//! function prototypes, typedefs, and struct/enum definitions. The
//! output is a tree of unresolved [`crate::types::TypeRef`]s; alias
//! resolution happens later in `semantic`. The parser never consults
//! the type registry: a bare identifier in type position is simply an
//! unresolved named type.

pub mod declarations;
pub mod errors;
pub mod types;

use crate::lexer::{Token, TokenKind};
use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};
use std::collections::VecDeque;

pub use declarations::{
    RawDeclaration, RawEnum, RawEnumVariant, RawField, RawFunction, RawParameter, RawStruct,
};
pub use errors::ParseError;

/// Declaration parser over one header unit's tokens.
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    end: SourceLocation,
}

impl Parser {
    /// Create a new parser. The token stream is expected to end with an
    /// `EndOfFile` token, which also provides the end-of-unit location
    /// for diagnostics.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| t.span.end.clone())
            .unwrap_or_else(SourceLocation::dummy);
        Self {
            tokens: tokens.into(),
            end,
        }
    }

    /// Lex and parse a unit in one step.
    pub fn from_source(unit: &str, source: &str) -> Result<Self, AnalyzerError> {
        let tokens = crate::lexer::tokenize(unit, source).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(tokens))
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Check if current token matches expected kind
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        if let Some(token) = self.peek() {
            std::mem::discriminant(&token.kind) == std::mem::discriminant(kind)
        } else {
            matches!(kind, TokenKind::EndOfFile)
        }
    }

    /// Consume token if it matches expected kind
    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect and consume a specific token kind
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token, ParseError> {
        if let Some(token) = self.advance() {
            if std::mem::discriminant(&token.kind) == std::mem::discriminant(&kind) {
                Ok(token)
            } else {
                Err(ParseError::UnexpectedToken {
                    expected: format!("{kind} in {context}"),
                    found: token,
                })
            }
        } else {
            Err(ParseError::UnexpectedEndOfUnit {
                expected: format!("{kind} in {context}"),
                location: self.end.clone(),
            })
        }
    }

    /// Expect and consume an identifier, returning its text
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => Ok(name),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: format!("identifier ({context})"),
                found: token,
            }),
            None => Err(ParseError::UnexpectedEndOfUnit {
                expected: format!("identifier ({context})"),
                location: self.end.clone(),
            }),
        }
    }

    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        if let Some(token) = self.peek() {
            token.span.start.clone()
        } else {
            self.end.clone()
        }
    }

    /// Span from a start location to the current position
    pub(crate) fn span_from(&self, start: SourceLocation) -> SourceSpan {
        SourceSpan::new(start, self.current_location())
    }

    /// Parse a complete header unit into raw declarations.
    pub fn parse_unit(&mut self) -> Result<Vec<RawDeclaration>, AnalyzerError> {
        let mut declarations = Vec::new();

        while !self.check(&TokenKind::EndOfFile) {
            self.parse_declaration(&mut declarations)?;
        }

        Ok(declarations)
    }
}
