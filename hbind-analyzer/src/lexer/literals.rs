//! Literal scanning for the declaration lexer
//!
//! Integer literals appear in enum definitions; character and string
//! literals only appear in malformed headers but must still lex (or fail
//! with a located error) rather than derail the token stream.

use crate::lexer::{Lexer, TokenKind};
use hbind_common::AnalyzerError;

impl Lexer {
    /// Tokenize an integer literal (decimal or 0x-prefixed hex).
    pub(crate) fn tokenize_integer(&mut self) -> Result<TokenKind, AnalyzerError> {
        let mut number = String::new();

        if self.current_char() == Some('0') && self.peek_char(1) == Some('x') {
            number.push_str("0x");
            self.advance(); // '0'
            self.advance(); // 'x'

            while let Some(ch) = self.current_char() {
                if ch.is_ascii_hexdigit() {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }

            if number.len() == 2 {
                return Err(AnalyzerError::lexer_error(
                    "Invalid hex literal".to_string(),
                    self.current_location(),
                ));
            }

            let value = i64::from_str_radix(&number[2..], 16).map_err(|_| {
                AnalyzerError::lexer_error(
                    format!("Invalid hex literal: {number}"),
                    self.current_location(),
                )
            })?;

            return Ok(TokenKind::IntLiteral(value));
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = number.parse::<i64>().map_err(|_| {
            AnalyzerError::lexer_error(
                format!("Invalid integer literal: {number}"),
                self.current_location(),
            )
        })?;

        Ok(TokenKind::IntLiteral(value))
    }

    /// Tokenize a character literal
    pub(crate) fn tokenize_char_literal(&mut self) -> Result<TokenKind, AnalyzerError> {
        self.advance(); // Skip opening quote

        let ch = match self.current_char() {
            Some('\\') => {
                self.advance(); // Skip backslash
                match self.current_char() {
                    Some('n') => {
                        self.advance();
                        b'\n'
                    }
                    Some('t') => {
                        self.advance();
                        b'\t'
                    }
                    Some('r') => {
                        self.advance();
                        b'\r'
                    }
                    Some('\\') => {
                        self.advance();
                        b'\\'
                    }
                    Some('\'') => {
                        self.advance();
                        b'\''
                    }
                    Some('0') => {
                        self.advance();
                        0
                    }
                    Some(c) => {
                        return Err(AnalyzerError::lexer_error(
                            format!("Invalid escape sequence: \\{c}"),
                            self.current_location(),
                        ));
                    }
                    None => {
                        return Err(AnalyzerError::lexer_error(
                            "Unterminated character literal".to_string(),
                            self.current_location(),
                        ));
                    }
                }
            }
            Some(ch) if ch != '\'' => {
                self.advance();
                ch as u8
            }
            _ => {
                return Err(AnalyzerError::lexer_error(
                    "Empty character literal".to_string(),
                    self.current_location(),
                ));
            }
        };

        if self.current_char() != Some('\'') {
            return Err(AnalyzerError::lexer_error(
                "Unterminated character literal".to_string(),
                self.current_location(),
            ));
        }

        self.advance(); // Skip closing quote
        Ok(TokenKind::CharLiteral(ch))
    }

    /// Tokenize a string literal
    pub(crate) fn tokenize_string_literal(&mut self) -> Result<TokenKind, AnalyzerError> {
        let start = self.current_location();
        self.advance(); // Skip opening quote
        let mut string = String::new();

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(TokenKind::StringLiteral(string));
                }
                '\\' => {
                    self.advance(); // Skip backslash
                    match self.current_char() {
                        Some('n') => {
                            string.push('\n');
                            self.advance();
                        }
                        Some('t') => {
                            string.push('\t');
                            self.advance();
                        }
                        Some('r') => {
                            string.push('\r');
                            self.advance();
                        }
                        Some('\\') => {
                            string.push('\\');
                            self.advance();
                        }
                        Some('"') => {
                            string.push('"');
                            self.advance();
                        }
                        Some('0') => {
                            string.push('\0');
                            self.advance();
                        }
                        Some(c) => {
                            return Err(AnalyzerError::lexer_error(
                                format!("Invalid escape sequence: \\{c}"),
                                self.current_location(),
                            ));
                        }
                        None => {
                            return Err(AnalyzerError::lexer_error(
                                "Unterminated string literal".to_string(),
                                start,
                            ));
                        }
                    }
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(AnalyzerError::lexer_error(
            "Unterminated string literal".to_string(),
            start,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn single(input: &str) -> TokenKind {
        let tokens: Vec<_> = tokenize("test.h", input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        tokens[0].kind.clone()
    }

    #[test]
    fn test_decimal_and_hex() {
        assert_eq!(single("1024"), TokenKind::IntLiteral(1024));
        assert_eq!(single("0x10"), TokenKind::IntLiteral(16));
    }

    #[test]
    fn test_char_escapes() {
        assert_eq!(single(r"'\n'"), TokenKind::CharLiteral(b'\n'));
        assert_eq!(single(r"'\0'"), TokenKind::CharLiteral(0));
        assert_eq!(single(r"'\\'"), TokenKind::CharLiteral(b'\\'));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            single(r#""a\tb""#),
            TokenKind::StringLiteral("a\tb".to_string())
        );
    }

    #[test]
    fn test_invalid_hex_literal() {
        let result: Result<Vec<_>, _> = tokenize("test.h", "0x").collect();
        assert!(matches!(result, Err(AnalyzerError::Lex { .. })));
    }

    #[test]
    fn test_empty_char_literal() {
        let result: Result<Vec<_>, _> = tokenize("test.h", "''").collect();
        assert!(matches!(result, Err(AnalyzerError::Lex { .. })));
    }
}
