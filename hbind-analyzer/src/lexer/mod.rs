//! Header declaration lexer
//!
//! Tokenizes preprocessed header text into declaration tokens: keywords,
//! identifiers, punctuation, and literals. Comments and whitespace are
//! skipped and produce no tokens. Unterminated literals or comments and
//! unknown characters surface as lexical errors carrying the offending
//! offset; nothing is silently dropped.

pub mod literals;
pub mod token;

pub use token::{Token, TokenKind};

use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};
use std::collections::HashMap;

/// Lexer over one header unit.
///
/// The lexer is itself a finite iterator of `Result<Token, AnalyzerError>`
/// ending with a single `EndOfFile` token (or stopping at the first
/// error). It is cheap to clone: callers that need to rescan clone it,
/// or call [`tokenize`] again.
#[derive(Debug, Clone)]
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    unit: String,
    keywords: HashMap<String, TokenKind>,
    finished: bool,
}

/// Tokenize a header unit. `unit` names the unit in diagnostics.
pub fn tokenize(unit: &str, input: &str) -> Lexer {
    Lexer::new(unit, input)
}

impl Lexer {
    pub fn new(unit: &str, input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            unit: unit.to_string(),
            keywords: HashMap::new(),
            finished: false,
        };

        lexer.initialize_keywords();
        lexer
    }

    /// Initialize keyword map
    fn initialize_keywords(&mut self) {
        let keywords = [
            ("void", TokenKind::Void),
            ("bool", TokenKind::Bool),
            ("_Bool", TokenKind::Bool), // stdbool.h expands `bool` to this
            ("char", TokenKind::Char),
            ("short", TokenKind::Short),
            ("int", TokenKind::Int),
            ("long", TokenKind::Long),
            ("float", TokenKind::Float),
            ("double", TokenKind::Double),
            ("signed", TokenKind::Signed),
            ("unsigned", TokenKind::Unsigned),
            ("const", TokenKind::Const),
            ("volatile", TokenKind::Volatile),
            ("struct", TokenKind::Struct),
            ("union", TokenKind::Union),
            ("enum", TokenKind::Enum),
            ("typedef", TokenKind::Typedef),
            ("extern", TokenKind::Extern),
            ("static", TokenKind::Static),
        ];

        for (keyword, kind) in keywords {
            self.keywords.insert(keyword.to_string(), kind);
        }
    }

    /// Get current character
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    pub(crate) fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Advance to next character
    pub(crate) fn advance(&mut self) -> Option<char> {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    /// Get current location
    pub(crate) fn current_location(&self) -> SourceLocation {
        SourceLocation::new(&self.unit, self.line, self.column, self.position as u32)
    }

    /// Skip whitespace and comments. Comments never become tokens; an
    /// unterminated block comment is a lexical error.
    fn skip_trivia(&mut self) -> Result<(), AnalyzerError> {
        loop {
            match self.current_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_char(1) == Some('/') => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_char(1) == Some('*') => {
                    let start = self.current_location();
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char() {
                            Some('*') if self.peek_char(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                            None => {
                                return Err(AnalyzerError::lexer_error(
                                    "Unterminated block comment".to_string(),
                                    start,
                                ));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Tokenize an identifier or keyword
    fn tokenize_identifier(&mut self) -> TokenKind {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if let Some(keyword) = self.keywords.get(&identifier) {
            keyword.clone()
        } else {
            TokenKind::Identifier(identifier)
        }
    }

    /// Get next token
    pub(crate) fn next_token(&mut self) -> Result<Token, AnalyzerError> {
        self.skip_trivia()?;

        let start = self.current_location();

        let kind = match self.current_char() {
            None => TokenKind::EndOfFile,

            Some(ch) if ch.is_alphabetic() || ch == '_' => self.tokenize_identifier(),

            Some(ch) if ch.is_ascii_digit() => self.tokenize_integer()?,

            Some('\'') => self.tokenize_char_literal()?,

            Some('"') => self.tokenize_string_literal()?,

            Some('*') => {
                self.advance();
                TokenKind::Star
            }
            Some('(') => {
                self.advance();
                TokenKind::LeftParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RightParen
            }
            Some('{') => {
                self.advance();
                TokenKind::LeftBrace
            }
            Some('}') => {
                self.advance();
                TokenKind::RightBrace
            }
            Some('[') => {
                self.advance();
                TokenKind::LeftBracket
            }
            Some(']') => {
                self.advance();
                TokenKind::RightBracket
            }
            Some(';') => {
                self.advance();
                TokenKind::Semicolon
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some(':') => {
                self.advance();
                TokenKind::Colon
            }
            Some('=') => {
                self.advance();
                TokenKind::Equal
            }
            Some('-') => {
                self.advance();
                TokenKind::Minus
            }

            Some('.') => {
                if self.peek_char(1) == Some('.') && self.peek_char(2) == Some('.') {
                    self.advance();
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    return Err(AnalyzerError::lexer_error(
                        "Stray '.' (only '...' is meaningful in a declaration)".to_string(),
                        start,
                    ));
                }
            }

            Some(ch) => {
                return Err(AnalyzerError::lexer_error(
                    format!("Unexpected character: {ch}"),
                    start,
                ));
            }
        };

        let end = self.current_location();
        let span = SourceSpan::new(start, end);

        Ok(Token::new(kind, span))
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, AnalyzerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) => {
                if matches!(token.kind, TokenKind::EndOfFile) {
                    self.finished = true;
                }
                Some(Ok(token))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
