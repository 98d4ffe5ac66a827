//! Type representations for header declarations
//!
//! Two layers. `TypeRef` is a type as spelled at a declaration site:
//! a base name, a pointer depth, and qualifiers, before any alias is
//! consulted. `TypeDescriptor` is the canonical form the resolver
//! produces: alias-free, except where an override rule deliberately
//! preserves a distinct descriptor (`CString`, `Bytes`).

use hbind_common::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Floating-point width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::W32 => 32,
            FloatWidth::W64 => 64,
        }
    }
}

/// An unresolved type reference as spelled in a declaration.
///
/// Multi-keyword spellings are already canonicalized by the parser
/// (`unsigned long int` arrives here as `unsigned long`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub pointer_depth: u32,
    pub is_const: bool,
    pub span: SourceSpan,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, pointer_depth: u32, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            pointer_depth,
            is_const: false,
            span,
        }
    }

    /// Structural comparison ignoring spans: two spellings of the same
    /// type at different positions are the same reference.
    pub fn same_spelling(&self, other: &TypeRef) -> bool {
        self.name == other.name
            && self.pointer_depth == other.pointer_depth
            && self.is_const == other.is_const
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.name)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// Canonical resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Void,
    Bool,
    Int { width: IntWidth, signed: bool },
    Float { width: FloatWidth },
    Pointer(Box<TypeDescriptor>),
    /// A struct (or other registered named aggregate) by identity.
    Named(String),
    /// `char*` at pointer depth exactly one: a text handle, not a
    /// pointer to a signed 8-bit integer.
    CString,
    /// `uint8_t*`: a byte pointer, distinct from `CString` even when the
    /// unit's typedefs alias `uint8_t` to plain `char`.
    Bytes,
}

impl TypeDescriptor {
    /// Wrap `self` in `depth` pointer layers.
    pub fn wrapped(self, depth: u32) -> TypeDescriptor {
        (0..depth).fold(self, |ty, _| TypeDescriptor::Pointer(Box::new(ty)))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => write!(f, "void"),
            TypeDescriptor::Bool => write!(f, "bool"),
            TypeDescriptor::Int { width, signed: true } => write!(f, "i{}", width.bits()),
            TypeDescriptor::Int { width, signed: false } => write!(f, "u{}", width.bits()),
            TypeDescriptor::Float { width } => write!(f, "f{}", width.bits()),
            TypeDescriptor::Pointer(target) => write!(f, "ptr<{target}>"),
            TypeDescriptor::Named(name) => write!(f, "{name}"),
            TypeDescriptor::CString => write!(f, "cstring"),
            TypeDescriptor::Bytes => write!(f, "bytes"),
        }
    }
}

/// A resolved function parameter. The name is optional: `int f(int);`
/// is a complete prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Option<String>,
    pub ty: TypeDescriptor,
}

/// A resolved function prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: TypeDescriptor,
    pub params: Vec<Parameter>,
    pub is_variadic: bool,
    pub span: SourceSpan,
}

impl FunctionSignature {
    /// Structural compatibility. Parameter names and spans never
    /// distinguish two prototypes of the same function.
    pub fn same_signature(&self, other: &FunctionSignature) -> bool {
        self.return_type == other.return_type
            && self.is_variadic == other.is_variadic
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty)
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.ty)?;
        }
        if self.is_variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// A resolved struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// A resolved struct definition. Fields stay in declaration order
/// because that order is the memory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<StructField>,
    pub span: SourceSpan,
}

impl StructDefinition {
    pub fn same_layout(&self, other: &StructDefinition) -> bool {
        self.fields == other.fields
    }
}

/// An enum variant with its resolved constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    pub value: i64,
}

/// An enum definition. Registered with the type registry so enum-typed
/// parameters resolve; enums produce no symbol table entry of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    pub variants: Vec<EnumVariant>,
    pub span: SourceSpan,
}
