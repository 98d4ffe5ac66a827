//! Token definitions for the declaration lexer

use hbind_common::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration token kinds.
///
/// Multi-word type spellings (`unsigned long int`) stay split into their
/// component keyword tokens; the parser decides how many belong to one
/// base type. Comments and whitespace never become tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    IntLiteral(i64),
    CharLiteral(u8),
    StringLiteral(String),

    // Identifiers
    Identifier(String),

    // Type and declaration keywords
    Void,
    Bool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Const,
    Volatile,
    Struct,
    Union,
    Enum,
    Typedef,
    Extern,
    Static,

    // Punctuation
    Star,         // *
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Semicolon,    // ;
    Comma,        // ,
    Colon,        // :
    Equal,        // =
    Minus,        // -
    Ellipsis,     // ...

    EndOfFile,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "{n}"),
            TokenKind::CharLiteral(c) => write!(f, "'{}'", *c as char),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(s) => write!(f, "{s}"),

            TokenKind::Void => write!(f, "void"),
            TokenKind::Bool => write!(f, "bool"),
            TokenKind::Char => write!(f, "char"),
            TokenKind::Short => write!(f, "short"),
            TokenKind::Int => write!(f, "int"),
            TokenKind::Long => write!(f, "long"),
            TokenKind::Float => write!(f, "float"),
            TokenKind::Double => write!(f, "double"),
            TokenKind::Signed => write!(f, "signed"),
            TokenKind::Unsigned => write!(f, "unsigned"),
            TokenKind::Const => write!(f, "const"),
            TokenKind::Volatile => write!(f, "volatile"),
            TokenKind::Struct => write!(f, "struct"),
            TokenKind::Union => write!(f, "union"),
            TokenKind::Enum => write!(f, "enum"),
            TokenKind::Typedef => write!(f, "typedef"),
            TokenKind::Extern => write!(f, "extern"),
            TokenKind::Static => write!(f, "static"),

            TokenKind::Star => write!(f, "*"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Ellipsis => write!(f, "..."),

            TokenKind::EndOfFile => write!(f, "end of unit"),
        }
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span.start)
    }
}
