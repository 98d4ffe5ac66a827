//! Alias-chain walking and override rules
//!
//! Rewrites unresolved `TypeRef`s into canonical `TypeDescriptor`s by
//! walking the typedef chain one hop at a time, accumulating pointer
//! depth across hops. An explicit visited set bounds the walk: a chain
//! revisiting a name is a cycle error, never an endless loop.
//!
//! The override table is consulted with the current spelling and
//! accumulated depth before every registry lookup. Checking the declared
//! name first is what makes `uint8_t` opaque: even when a unit says
//! `typedef char uint8_t;`, the declared name wins over the alias
//! target. Checking again at each hop is what collapses
//! `typedef char* string;` to a text handle, the same way `char*`
//! itself resolves.

use crate::semantic::errors::SemanticError;
use crate::semantic::registry::TypeRegistry;
use crate::types::{IntWidth, TypeDescriptor, TypeRef};
use std::collections::HashSet;

/// Resolves type references against a registry.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
}

/// The override table: spellings that never collapse to their alias
/// target. Ordered; first match wins.
fn override_descriptor(name: &str, depth: u32) -> Option<TypeDescriptor> {
    match (name, depth) {
        // a lone char* is a text handle, not a pointer to i8
        ("char", 1) => Some(TypeDescriptor::CString),
        // uint8_t resolves by declared name at every depth
        ("uint8_t", 0) => Some(TypeDescriptor::Int {
            width: IntWidth::W8,
            signed: false,
        }),
        ("uint8_t", depth) => Some(TypeDescriptor::Bytes.wrapped(depth - 1)),
        _ => None,
    }
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `ty` to its canonical descriptor. `referenced_by` names
    /// the declaration being resolved, for diagnostics.
    pub fn resolve(
        &self,
        ty: &TypeRef,
        referenced_by: &str,
    ) -> Result<TypeDescriptor, SemanticError> {
        let mut name = ty.name.clone();
        let mut depth = ty.pointer_depth;
        let mut visited: HashSet<String> = HashSet::new();

        loop {
            if let Some(descriptor) = override_descriptor(&name, depth) {
                return Ok(descriptor);
            }
            if let Some(builtin) = self.registry.builtin(&name) {
                return Ok(builtin.clone().wrapped(depth));
            }
            if self.registry.struct_def(&name).is_some() {
                return Ok(TypeDescriptor::Named(name).wrapped(depth));
            }
            if self.registry.enum_def(&name).is_some() {
                // C enums are int-compatible
                return Ok(TypeDescriptor::Int {
                    width: IntWidth::W32,
                    signed: true,
                }
                .wrapped(depth));
            }

            if !visited.insert(name.clone()) {
                return Err(SemanticError::AliasCycle {
                    type_name: name,
                    location: ty.span.start.clone(),
                });
            }

            match self.registry.resolve_alias(&name) {
                Some(target) => {
                    depth += target.pointer_depth;
                    name = target.name.clone();
                }
                None => {
                    return Err(SemanticError::UnresolvedType {
                        type_name: name,
                        referenced_by: referenced_by.to_string(),
                        location: ty.span.start.clone(),
                    });
                }
            }
        }
    }
}
