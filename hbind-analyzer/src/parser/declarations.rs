//! Declaration-shape recognition
//!
//! Turns the token stream into raw (unresolved) declarations: function
//! prototypes, typedefs, struct definitions, enum definitions. Anything
//! else is a parse error naming the offending location; the parser never
//! guesses.

use crate::lexer::TokenKind;
use crate::parser::errors::ParseError;
use crate::parser::types::TypeSpecifier;
use crate::parser::Parser;
use crate::types::TypeRef;
use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};
use log::warn;

/// A declaration as parsed, before type resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDeclaration {
    Function(RawFunction),
    Typedef {
        name: String,
        target: TypeRef,
        span: SourceSpan,
    },
    Struct(RawStruct),
    Enum(RawEnum),
}

/// An unresolved function prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFunction {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<RawParameter>,
    pub is_variadic: bool,
    pub span: SourceSpan,
}

/// An unresolved parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    pub name: Option<String>,
    pub ty: TypeRef,
}

/// An unresolved struct definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStruct {
    pub name: String,
    pub fields: Vec<RawField>,
    pub span: SourceSpan,
}

/// An unresolved struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub ty: TypeRef,
}

/// An enum definition (values are already constant-folded).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEnum {
    pub name: String,
    pub variants: Vec<RawEnumVariant>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEnumVariant {
    pub name: String,
    pub value: i64,
}

impl Parser {
    /// Parse one top-level declaration. Pushes onto `out` because a
    /// tagged `typedef struct tag {...} alias;` yields two declarations
    /// (the struct and the alias).
    pub(crate) fn parse_declaration(
        &mut self,
        out: &mut Vec<RawDeclaration>,
    ) -> Result<(), AnalyzerError> {
        let start = self.current_location();

        if self.check(&TokenKind::Extern) {
            // header prototypes are extern by definition; tolerate the
            // redundant spelling
            warn!("ignoring extern storage class at {start}");
            self.advance();
        }
        if self.check(&TokenKind::Static) {
            return Err(ParseError::Unsupported {
                construct: "static declarations".to_string(),
                location: start,
            }
            .into());
        }

        if self.match_token(&TokenKind::Typedef) {
            return self.parse_typedef(out, start);
        }

        match self.parse_type_specifier()? {
            TypeSpecifier::StructDef { name, fields, span } => {
                let Some(name) = name else {
                    return Err(ParseError::InvalidTypeSpecifier {
                        message: "Anonymous struct requires a typedef name".to_string(),
                        location: span.start,
                    }
                    .into());
                };
                self.expect(TokenKind::Semicolon, "struct definition")?;
                out.push(RawDeclaration::Struct(RawStruct { name, fields, span }));
                Ok(())
            }
            TypeSpecifier::EnumDef {
                name,
                variants,
                span,
            } => {
                let Some(name) = name else {
                    return Err(ParseError::InvalidTypeSpecifier {
                        message: "Anonymous enum requires a typedef name".to_string(),
                        location: span.start,
                    }
                    .into());
                };
                self.expect(TokenKind::Semicolon, "enum definition")?;
                out.push(RawDeclaration::Enum(RawEnum {
                    name,
                    variants,
                    span,
                }));
                Ok(())
            }
            TypeSpecifier::Base(base) => {
                let return_type = self.parse_pointer_suffix(base);
                let name = self.expect_identifier("declaration name")?;
                let func = self.parse_prototype(name, return_type, start)?;
                out.push(RawDeclaration::Function(func));
                Ok(())
            }
        }
    }

    /// Parse a typedef; the `typedef` keyword is already consumed.
    fn parse_typedef(
        &mut self,
        out: &mut Vec<RawDeclaration>,
        start: SourceLocation,
    ) -> Result<(), AnalyzerError> {
        match self.parse_type_specifier()? {
            TypeSpecifier::Base(base) => {
                let target = self.parse_pointer_suffix(base);
                let name = self.expect_identifier("typedef name")?;
                if self.check(&TokenKind::LeftBracket) {
                    return Err(ParseError::Unsupported {
                        construct: "array typedefs".to_string(),
                        location: self.current_location(),
                    }
                    .into());
                }
                if self.check(&TokenKind::LeftParen) {
                    return Err(ParseError::Unsupported {
                        construct: "function pointer typedefs".to_string(),
                        location: self.current_location(),
                    }
                    .into());
                }
                self.expect(TokenKind::Semicolon, "typedef")?;
                out.push(RawDeclaration::Typedef {
                    name,
                    target,
                    span: self.span_from(start),
                });
            }
            TypeSpecifier::StructDef { name, fields, span } => {
                if self.check(&TokenKind::Star) {
                    return Err(ParseError::Unsupported {
                        construct: "pointer typedefs of struct definitions".to_string(),
                        location: self.current_location(),
                    }
                    .into());
                }
                let alias = self.expect_identifier("typedef name")?;
                self.expect(TokenKind::Semicolon, "typedef")?;
                match name {
                    // `typedef struct { ... } point;` - the typedef name
                    // becomes the struct's identity
                    None => out.push(RawDeclaration::Struct(RawStruct {
                        name: alias,
                        fields,
                        span,
                    })),
                    Some(tag) if tag == alias => out.push(RawDeclaration::Struct(RawStruct {
                        name: tag,
                        fields,
                        span,
                    })),
                    Some(tag) => {
                        out.push(RawDeclaration::Struct(RawStruct {
                            name: tag.clone(),
                            fields,
                            span: span.clone(),
                        }));
                        out.push(RawDeclaration::Typedef {
                            name: alias,
                            target: TypeRef::new(tag, 0, span.clone()),
                            span,
                        });
                    }
                }
            }
            TypeSpecifier::EnumDef {
                name,
                variants,
                span,
            } => {
                let alias = self.expect_identifier("typedef name")?;
                self.expect(TokenKind::Semicolon, "typedef")?;
                match name {
                    None => out.push(RawDeclaration::Enum(RawEnum {
                        name: alias,
                        variants,
                        span,
                    })),
                    Some(tag) if tag == alias => out.push(RawDeclaration::Enum(RawEnum {
                        name: tag,
                        variants,
                        span,
                    })),
                    Some(tag) => {
                        out.push(RawDeclaration::Enum(RawEnum {
                            name: tag.clone(),
                            variants,
                            span: span.clone(),
                        }));
                        out.push(RawDeclaration::Typedef {
                            name: alias,
                            target: TypeRef::new(tag, 0, span.clone()),
                            span,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse a function prototype's parameter list and trailing
    /// semicolon; the return type and name are already consumed.
    fn parse_prototype(
        &mut self,
        name: String,
        return_type: TypeRef,
        start: SourceLocation,
    ) -> Result<RawFunction, AnalyzerError> {
        self.expect(TokenKind::LeftParen, "function prototype")?;

        let mut params = Vec::new();
        let mut is_variadic = false;

        // `(void)` means an empty parameter list, but `void*` is a real
        // parameter type, so look one token ahead
        if self.check(&TokenKind::Void)
            && matches!(
                self.tokens.get(1).map(|t| &t.kind),
                Some(TokenKind::RightParen)
            )
        {
            self.advance();
        } else if !self.check(&TokenKind::RightParen) {
            loop {
                if self.match_token(&TokenKind::Ellipsis) {
                    // the ellipsis sets the flag and synthesizes no
                    // parameter; it must be last
                    is_variadic = true;
                    break;
                }
                params.push(self.parse_parameter()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "parameter list")?;
        self.expect(TokenKind::Semicolon, "function prototype")?;

        Ok(RawFunction {
            name,
            return_type,
            params,
            is_variadic,
            span: self.span_from(start),
        })
    }

    /// Parse one parameter: a type and an optional name.
    fn parse_parameter(&mut self) -> Result<RawParameter, AnalyzerError> {
        let base = match self.parse_type_specifier()? {
            TypeSpecifier::Base(base) => base,
            TypeSpecifier::StructDef { span, .. } | TypeSpecifier::EnumDef { span, .. } => {
                return Err(ParseError::Unsupported {
                    construct: "struct/enum definitions in parameter lists".to_string(),
                    location: span.start,
                }
                .into());
            }
        };
        let ty = self.parse_pointer_suffix(base);

        let name = if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::Identifier(_))
        ) {
            Some(self.expect_identifier("parameter name")?)
        } else {
            None
        };

        if self.check(&TokenKind::LeftParen) {
            return Err(ParseError::Unsupported {
                construct: "function pointer parameters".to_string(),
                location: self.current_location(),
            }
            .into());
        }
        if self.check(&TokenKind::LeftBracket) {
            return Err(ParseError::Unsupported {
                construct: "array parameters".to_string(),
                location: self.current_location(),
            }
            .into());
        }

        Ok(RawParameter { name, ty })
    }
}
