//! Symbol table assembly
//!
//! The symbol table is the analyzer's output: identifier to resolved
//! definition, one table per analysis run. Iteration follows first
//! insertion order so the external binding generator sees declarations
//! in the order the headers introduced them.

use crate::semantic::errors::SemanticError;
use crate::types::{FunctionSignature, StructDefinition, TypeDescriptor};
use hbind_common::SourceSpan;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A resolved entry in the symbol table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Function(FunctionSignature),
    Struct(StructDefinition),
    TypedefAlias {
        name: String,
        target: TypeDescriptor,
        span: SourceSpan,
    },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Function(func) => &func.name,
            Symbol::Struct(def) => &def.name,
            Symbol::TypedefAlias { name, .. } => name,
        }
    }

    pub fn span(&self) -> &SourceSpan {
        match self {
            Symbol::Function(func) => &func.span,
            Symbol::Struct(def) => &def.span,
            Symbol::TypedefAlias { span, .. } => span,
        }
    }

    /// Structural equivalence: does a re-declaration of `other` under
    /// this symbol's name change anything?
    fn matches(&self, other: &Symbol) -> bool {
        match (self, other) {
            (Symbol::Function(a), Symbol::Function(b)) => a.same_signature(b),
            (Symbol::Struct(a), Symbol::Struct(b)) => a.same_layout(b),
            (
                Symbol::TypedefAlias { target: a, .. },
                Symbol::TypedefAlias { target: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// The final identifier to definition mapping for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol. A structurally identical re-declaration is a
    /// no-op (the same header processed twice); a conflicting one is an
    /// error naming both locations.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), SemanticError> {
        match self.symbols.get(symbol.name()) {
            Some(existing) if existing.matches(&symbol) => {
                debug!("accepting identical redeclaration of {}", symbol.name());
                Ok(())
            }
            Some(existing) => Err(SemanticError::ConflictingDefinition {
                name: symbol.name().to_string(),
                first: existing.span().start.clone(),
                second: symbol.span().start.clone(),
            }),
            None => {
                self.order.push(symbol.name().to_string());
                self.symbols.insert(symbol.name().to_string(), symbol);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// All symbols in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }

    /// Function signatures in first-insertion order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.iter().filter_map(|symbol| match symbol {
            Symbol::Function(func) => Some(func),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntWidth, Parameter};
    use hbind_common::SourceLocation;

    fn signature(name: &str, ret: TypeDescriptor, span: SourceSpan) -> FunctionSignature {
        FunctionSignature {
            name: name.to_string(),
            return_type: ret,
            params: vec![Parameter {
                name: Some("num".to_string()),
                ty: TypeDescriptor::Int {
                    width: IntWidth::W32,
                    signed: true,
                },
            }],
            is_variadic: false,
            span,
        }
    }

    fn span_at(unit: &str, line: u32) -> SourceSpan {
        SourceSpan::from_location(SourceLocation::new(unit, line, 1, 0))
    }

    #[test]
    fn test_identical_redeclaration_is_a_noop() {
        let mut table = SymbolTable::new();
        table
            .insert(Symbol::Function(signature(
                "to_int",
                TypeDescriptor::Int {
                    width: IntWidth::W32,
                    signed: true,
                },
                span_at("a.h", 1),
            )))
            .unwrap();
        // same shape from a different unit and line
        table
            .insert(Symbol::Function(signature(
                "to_int",
                TypeDescriptor::Int {
                    width: IntWidth::W32,
                    signed: true,
                },
                span_at("b.h", 9),
            )))
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_conflicting_redeclaration_names_both_locations() {
        let mut table = SymbolTable::new();
        table
            .insert(Symbol::Function(signature(
                "to_int",
                TypeDescriptor::Int {
                    width: IntWidth::W32,
                    signed: true,
                },
                span_at("a.h", 1),
            )))
            .unwrap();
        let err = table
            .insert(Symbol::Function(signature(
                "to_int",
                TypeDescriptor::Bool,
                span_at("b.h", 9),
            )))
            .unwrap_err();
        match err {
            SemanticError::ConflictingDefinition {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "to_int");
                assert_eq!(first.unit, "a.h");
                assert_eq!(second.unit, "b.h");
                assert_eq!(second.line, 9);
            }
            other => panic!("Expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut table = SymbolTable::new();
        for name in ["zeta", "alpha", "mid"] {
            table
                .insert(Symbol::TypedefAlias {
                    name: name.to_string(),
                    target: TypeDescriptor::Bool,
                    span: span_at("a.h", 1),
                })
                .unwrap();
        }
        let names: Vec<_> = table.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_function_and_typedef_with_same_name_conflict() {
        let mut table = SymbolTable::new();
        table
            .insert(Symbol::TypedefAlias {
                name: "thing".to_string(),
                target: TypeDescriptor::Bool,
                span: span_at("a.h", 1),
            })
            .unwrap();
        let err = table
            .insert(Symbol::Function(signature(
                "thing",
                TypeDescriptor::Void,
                span_at("a.h", 2),
            )))
            .unwrap_err();
        assert!(matches!(err, SemanticError::ConflictingDefinition { .. }));
    }
}
