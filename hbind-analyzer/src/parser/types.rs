//! Type-specifier parsing
//!
//! Collects consecutive type keywords into one canonical base spelling,
//! handles struct/enum specifiers (references and definitions), and
//! applies pointer-star suffixes to produce `TypeRef`s.

use crate::lexer::TokenKind;
use crate::parser::errors::ParseError;
use crate::parser::{Parser, RawEnumVariant, RawField};
use crate::types::TypeRef;
use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};
use log::warn;

/// Outcome of parsing a type specifier: either a plain reference, or a
/// struct/enum definition body that the declaration level turns into its
/// own raw declaration.
#[derive(Debug)]
pub(crate) enum TypeSpecifier {
    Base(TypeRef),
    StructDef {
        name: Option<String>,
        fields: Vec<RawField>,
        span: SourceSpan,
    },
    EnumDef {
        name: Option<String>,
        variants: Vec<RawEnumVariant>,
        span: SourceSpan,
    },
}

impl Parser {
    /// Parse a type specifier, including leading qualifiers.
    pub(crate) fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, AnalyzerError> {
        let start = self.current_location();

        let mut is_const = false;
        loop {
            if self.match_token(&TokenKind::Const) {
                is_const = true;
            } else if self.check(&TokenKind::Volatile) {
                // volatile has no bearing on a binding signature
                warn!("ignoring volatile qualifier at {}", self.current_location());
                self.advance();
            } else {
                break;
            }
        }

        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Struct) => {
                self.advance();
                self.parse_struct_specifier(is_const, start)
            }
            Some(TokenKind::Enum) => {
                self.advance();
                self.parse_enum_specifier(is_const, start)
            }
            Some(TokenKind::Union) => Err(ParseError::Unsupported {
                construct: "unions".to_string(),
                location: self.current_location(),
            }
            .into()),
            Some(TokenKind::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                let mut ty = TypeRef::new(name, 0, self.span_from(start));
                ty.is_const = is_const;
                Ok(TypeSpecifier::Base(ty))
            }
            _ => {
                let name = self.parse_builtin_spelling()?;
                let mut ty = TypeRef::new(name, 0, self.span_from(start));
                ty.is_const = is_const;
                Ok(TypeSpecifier::Base(ty))
            }
        }
    }

    /// Collect consecutive type keywords into a canonical builtin
    /// spelling. The lexer keeps `unsigned long int` as three tokens;
    /// this is where they become the single base type `unsigned long`.
    pub(crate) fn parse_builtin_spelling(&mut self) -> Result<String, ParseError> {
        let location = self.current_location();

        let mut signedness: Option<bool> = None;
        let mut long_count = 0u32;
        let mut is_short = false;
        let mut base: Option<&'static str> = None;

        loop {
            let kind = match self.peek().map(|t| &t.kind) {
                Some(kind) => kind.clone(),
                None => break,
            };
            match kind {
                TokenKind::Void | TokenKind::Bool | TokenKind::Char | TokenKind::Int
                | TokenKind::Float | TokenKind::Double => {
                    let word = match kind {
                        TokenKind::Void => "void",
                        TokenKind::Bool => "bool",
                        TokenKind::Char => "char",
                        TokenKind::Int => "int",
                        TokenKind::Float => "float",
                        _ => "double",
                    };
                    if let Some(previous) = base.replace(word) {
                        return Err(ParseError::InvalidTypeSpecifier {
                            message: format!("Cannot combine '{previous}' and '{word}'"),
                            location: self.current_location(),
                        });
                    }
                }
                TokenKind::Short => {
                    if is_short || long_count > 0 {
                        return Err(ParseError::InvalidTypeSpecifier {
                            message: "Invalid 'short' in type specifier".to_string(),
                            location: self.current_location(),
                        });
                    }
                    is_short = true;
                }
                TokenKind::Long => {
                    long_count += 1;
                    if long_count > 2 || is_short {
                        return Err(ParseError::InvalidTypeSpecifier {
                            message: "Invalid 'long' in type specifier".to_string(),
                            location: self.current_location(),
                        });
                    }
                }
                TokenKind::Signed => {
                    if signedness.replace(true).is_some() {
                        return Err(ParseError::InvalidTypeSpecifier {
                            message: "Conflicting signedness in type specifier".to_string(),
                            location: self.current_location(),
                        });
                    }
                }
                TokenKind::Unsigned => {
                    if signedness.replace(false).is_some() {
                        return Err(ParseError::InvalidTypeSpecifier {
                            message: "Conflicting signedness in type specifier".to_string(),
                            location: self.current_location(),
                        });
                    }
                }
                _ => break,
            }
            self.advance();
        }

        let has_modifier = signedness.is_some() || long_count > 0 || is_short;
        if base.is_none() && !has_modifier {
            return Err(ParseError::InvalidTypeSpecifier {
                message: "Expected type specifier".to_string(),
                location,
            });
        }

        // `unsigned`, `long`, `short` alone all mean flavors of int
        let base = base.unwrap_or("int");

        match base {
            "void" | "bool" | "float" => {
                if has_modifier {
                    return Err(ParseError::InvalidTypeSpecifier {
                        message: format!("'{base}' cannot take length or sign modifiers"),
                        location,
                    });
                }
            }
            "double" => {
                if signedness.is_some() || is_short {
                    return Err(ParseError::InvalidTypeSpecifier {
                        message: "'double' cannot take sign or 'short' modifiers".to_string(),
                        location,
                    });
                }
                if long_count > 0 {
                    return Err(ParseError::Unsupported {
                        construct: "'long double' types".to_string(),
                        location,
                    });
                }
            }
            "char" => {
                if long_count > 0 || is_short {
                    return Err(ParseError::InvalidTypeSpecifier {
                        message: "'char' cannot take length modifiers".to_string(),
                        location,
                    });
                }
            }
            _ => {}
        }

        let spelled = match base {
            "char" => match signedness {
                None => "char".to_string(),
                Some(true) => "signed char".to_string(),
                Some(false) => "unsigned char".to_string(),
            },
            "int" => {
                let core = if is_short {
                    "short"
                } else {
                    match long_count {
                        0 => "int",
                        1 => "long",
                        _ => "long long",
                    }
                };
                if signedness == Some(false) {
                    format!("unsigned {core}")
                } else {
                    // `signed int`, `signed long`, ... collapse to the plain spelling
                    core.to_string()
                }
            }
            other => other.to_string(),
        };

        Ok(spelled)
    }

    /// Parse a struct specifier; the `struct` keyword is already
    /// consumed. With a body this is a definition, without one it is a
    /// reference to a named struct.
    fn parse_struct_specifier(
        &mut self,
        is_const: bool,
        start: SourceLocation,
    ) -> Result<TypeSpecifier, AnalyzerError> {
        let name = if let Some(TokenKind::Identifier(name)) = self.peek().map(|t| &t.kind) {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        };

        if self.match_token(&TokenKind::LeftBrace) {
            let mut fields = Vec::new();

            while !self.check(&TokenKind::RightBrace) && !self.check(&TokenKind::EndOfFile) {
                fields.push(self.parse_struct_field()?);
            }

            self.expect(TokenKind::RightBrace, "struct definition")?;
            Ok(TypeSpecifier::StructDef {
                name,
                fields,
                span: self.span_from(start),
            })
        } else {
            match name {
                Some(name) => {
                    let mut ty = TypeRef::new(name, 0, self.span_from(start));
                    ty.is_const = is_const;
                    Ok(TypeSpecifier::Base(ty))
                }
                None => Err(ParseError::InvalidTypeSpecifier {
                    message: "Expected struct name or body".to_string(),
                    location: self.current_location(),
                }
                .into()),
            }
        }
    }

    /// Parse one struct field: a nested declaration with no function or
    /// variadic shape permitted.
    fn parse_struct_field(&mut self) -> Result<RawField, AnalyzerError> {
        let base = match self.parse_type_specifier()? {
            TypeSpecifier::Base(base) => base,
            TypeSpecifier::StructDef { span, .. } | TypeSpecifier::EnumDef { span, .. } => {
                return Err(ParseError::Unsupported {
                    construct: "nested struct/enum definitions in fields".to_string(),
                    location: span.start,
                }
                .into());
            }
        };
        let ty = self.parse_pointer_suffix(base);
        let name = self.expect_identifier("field name")?;

        if self.check(&TokenKind::Colon) {
            return Err(ParseError::Unsupported {
                construct: "bit-fields".to_string(),
                location: self.current_location(),
            }
            .into());
        }
        if self.check(&TokenKind::LeftBracket) {
            return Err(ParseError::Unsupported {
                construct: "array fields".to_string(),
                location: self.current_location(),
            }
            .into());
        }
        if self.check(&TokenKind::LeftParen) {
            return Err(ParseError::Unsupported {
                construct: "function declarators in fields".to_string(),
                location: self.current_location(),
            }
            .into());
        }

        self.expect(TokenKind::Semicolon, "struct field")?;
        Ok(RawField { name, ty })
    }

    /// Parse an enum specifier; the `enum` keyword is already consumed.
    fn parse_enum_specifier(
        &mut self,
        is_const: bool,
        start: SourceLocation,
    ) -> Result<TypeSpecifier, AnalyzerError> {
        let name = if let Some(TokenKind::Identifier(name)) = self.peek().map(|t| &t.kind) {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        };

        if self.match_token(&TokenKind::LeftBrace) {
            let mut variants = Vec::new();
            let mut next_value = 0i64;

            if !self.check(&TokenKind::RightBrace) {
                loop {
                    let variant_name = self.expect_identifier("enum variant")?;

                    let value = if self.match_token(&TokenKind::Equal) {
                        let negative = self.match_token(&TokenKind::Minus);
                        match self.advance() {
                            Some(token) => match token.kind {
                                TokenKind::IntLiteral(v) => {
                                    if negative {
                                        -v
                                    } else {
                                        v
                                    }
                                }
                                _ => {
                                    return Err(ParseError::UnexpectedToken {
                                        expected: "integer constant for enum value".to_string(),
                                        found: token,
                                    }
                                    .into());
                                }
                            },
                            None => {
                                return Err(ParseError::UnexpectedEndOfUnit {
                                    expected: "integer constant for enum value".to_string(),
                                    location: self.current_location(),
                                }
                                .into());
                            }
                        }
                    } else {
                        next_value
                    };

                    next_value = value + 1;
                    variants.push(RawEnumVariant {
                        name: variant_name,
                        value,
                    });

                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                    // Allow trailing comma
                    if self.check(&TokenKind::RightBrace) {
                        break;
                    }
                }
            }

            self.expect(TokenKind::RightBrace, "enum definition")?;
            Ok(TypeSpecifier::EnumDef {
                name,
                variants,
                span: self.span_from(start),
            })
        } else {
            match name {
                Some(name) => {
                    let mut ty = TypeRef::new(name, 0, self.span_from(start));
                    ty.is_const = is_const;
                    Ok(TypeSpecifier::Base(ty))
                }
                None => Err(ParseError::InvalidTypeSpecifier {
                    message: "Expected enum name or body".to_string(),
                    location: self.current_location(),
                }
                .into()),
            }
        }
    }

    /// Apply pointer-star suffixes to a base type.
    pub(crate) fn parse_pointer_suffix(&mut self, mut base: TypeRef) -> TypeRef {
        while self.check(&TokenKind::Star) {
            if let Some(token) = self.advance() {
                base.pointer_depth += 1;
                base.span = base.span.extend(&token.span);
            }
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spelling(input: &str) -> Result<String, ParseError> {
        let mut parser = Parser::from_source("test.h", input).unwrap();
        parser.parse_builtin_spelling()
    }

    #[test]
    fn test_canonical_spellings() {
        assert_eq!(spelling("int").unwrap(), "int");
        assert_eq!(spelling("unsigned").unwrap(), "unsigned int");
        assert_eq!(spelling("signed int").unwrap(), "int");
        assert_eq!(spelling("unsigned long int").unwrap(), "unsigned long");
        assert_eq!(spelling("long long int").unwrap(), "long long");
        assert_eq!(spelling("long int").unwrap(), "long");
        assert_eq!(spelling("unsigned char").unwrap(), "unsigned char");
        assert_eq!(spelling("short int").unwrap(), "short");
        assert_eq!(spelling("unsigned short").unwrap(), "unsigned short");
        assert_eq!(spelling("double").unwrap(), "double");
    }

    #[test]
    fn test_rejected_spellings() {
        assert!(spelling("long char").is_err());
        assert!(spelling("short long").is_err());
        assert!(spelling("long long long").is_err());
        assert!(spelling("signed unsigned").is_err());
        assert!(spelling("unsigned float").is_err());
        assert!(spelling("long double").is_err());
        assert!(spelling("int void").is_err());
    }
}
