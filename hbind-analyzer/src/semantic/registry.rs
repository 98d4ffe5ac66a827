//! Known-type table
//!
//! The registry is a pure lookup table: builtins seeded at construction,
//! typedef aliases, struct and enum definitions added as declarations
//! are processed. `resolve_alias` returns the immediate one-hop target
//! only; multi-hop walking lives in the resolver. A name occupies at
//! most one of the four tables.

use crate::semantic::errors::SemanticError;
use crate::types::{
    EnumDefinition, FloatWidth, IntWidth, StructDefinition, TypeDescriptor, TypeRef,
};
use hbind_common::{SourceLocation, SourceSpan};
use std::collections::HashMap;

/// A typedef alias entry: the immediate target as spelled, plus where
/// the typedef was declared. The first definition wins; identical
/// redefinitions are accepted as no-ops.
#[derive(Debug, Clone)]
pub struct TypedefEntry {
    pub target: TypeRef,
    pub span: SourceSpan,
}

/// The mutable table of known type names for one analysis run.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    builtins: HashMap<String, TypeDescriptor>,
    aliases: HashMap<String, TypedefEntry>,
    structs: HashMap<String, StructDefinition>,
    enums: HashMap<String, EnumDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            builtins: HashMap::new(),
            aliases: HashMap::new(),
            structs: HashMap::new(),
            enums: HashMap::new(),
        };
        registry.seed_builtins();
        registry
    }

    /// Seed the builtin spellings. Beyond the core C types, the
    /// fixed-width stdint names are known out of the box; `uint8_t` is
    /// deliberately absent because the resolver's override table owns
    /// that name at every pointer depth.
    fn seed_builtins(&mut self) {
        let int = |width, signed| TypeDescriptor::Int { width, signed };
        let builtins = [
            ("void", TypeDescriptor::Void),
            ("bool", TypeDescriptor::Bool),
            ("char", int(IntWidth::W8, true)),
            ("signed char", int(IntWidth::W8, true)),
            ("unsigned char", int(IntWidth::W8, false)),
            ("short", int(IntWidth::W16, true)),
            ("unsigned short", int(IntWidth::W16, false)),
            ("int", int(IntWidth::W32, true)),
            ("unsigned int", int(IntWidth::W32, false)),
            ("long", int(IntWidth::W64, true)),
            ("unsigned long", int(IntWidth::W64, false)),
            ("long long", int(IntWidth::W64, true)),
            ("unsigned long long", int(IntWidth::W64, false)),
            ("float", TypeDescriptor::Float { width: FloatWidth::W32 }),
            ("double", TypeDescriptor::Float { width: FloatWidth::W64 }),
            ("int8_t", int(IntWidth::W8, true)),
            ("int16_t", int(IntWidth::W16, true)),
            ("int32_t", int(IntWidth::W32, true)),
            ("int64_t", int(IntWidth::W64, true)),
            ("uint16_t", int(IntWidth::W16, false)),
            ("uint32_t", int(IntWidth::W32, false)),
            ("uint64_t", int(IntWidth::W64, false)),
        ];

        for (name, descriptor) in builtins {
            self.builtins.insert(name.to_string(), descriptor);
        }
    }

    /// Look up a builtin spelling.
    pub fn builtin(&self, name: &str) -> Option<&TypeDescriptor> {
        self.builtins.get(name)
    }

    /// Immediate one-hop alias target, if `name` is a typedef.
    pub fn resolve_alias(&self, name: &str) -> Option<&TypeRef> {
        self.aliases.get(name).map(|entry| &entry.target)
    }

    pub fn alias_entry(&self, name: &str) -> Option<&TypedefEntry> {
        self.aliases.get(name)
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructDefinition> {
        self.structs.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    /// Whether `name` is known in any namespace.
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
            || self.aliases.contains_key(name)
            || self.structs.contains_key(name)
            || self.enums.contains_key(name)
    }

    /// Where `name` was first defined, if it is known.
    fn first_definition(&self, name: &str) -> Option<SourceLocation> {
        if self.builtins.contains_key(name) {
            return Some(SourceLocation::predefined());
        }
        if let Some(entry) = self.aliases.get(name) {
            return Some(entry.span.start.clone());
        }
        if let Some(def) = self.structs.get(name) {
            return Some(def.span.start.clone());
        }
        if let Some(def) = self.enums.get(name) {
            return Some(def.span.start.clone());
        }
        None
    }

    /// Record a typedef alias. Idempotent on an identical spelling,
    /// an error on any other redefinition of the name.
    pub fn define_alias(
        &mut self,
        name: &str,
        target: TypeRef,
        span: SourceSpan,
    ) -> Result<(), SemanticError> {
        if let Some(entry) = self.aliases.get(name) {
            if entry.target.same_spelling(&target) {
                return Ok(());
            }
            return Err(SemanticError::ConflictingDefinition {
                name: name.to_string(),
                first: entry.span.start.clone(),
                second: span.start,
            });
        }
        if let Some(first) = self.first_definition(name) {
            return Err(SemanticError::ConflictingDefinition {
                name: name.to_string(),
                first,
                second: span.start,
            });
        }
        self.aliases
            .insert(name.to_string(), TypedefEntry { target, span });
        Ok(())
    }

    /// Record a struct definition. Idempotent on an identical layout,
    /// an error on any other redefinition of the name.
    pub fn define_struct(&mut self, def: StructDefinition) -> Result<(), SemanticError> {
        if let Some(existing) = self.structs.get(&def.name) {
            if existing.same_layout(&def) {
                return Ok(());
            }
            return Err(SemanticError::ConflictingDefinition {
                name: def.name,
                first: existing.span.start.clone(),
                second: def.span.start,
            });
        }
        if let Some(first) = self.first_definition(&def.name) {
            return Err(SemanticError::ConflictingDefinition {
                name: def.name,
                first,
                second: def.span.start,
            });
        }
        self.structs.insert(def.name.clone(), def);
        Ok(())
    }

    /// Record an enum definition. Same redefinition rules as structs.
    pub fn define_enum(&mut self, def: EnumDefinition) -> Result<(), SemanticError> {
        if let Some(existing) = self.enums.get(&def.name) {
            if existing.variants == def.variants {
                return Ok(());
            }
            return Err(SemanticError::ConflictingDefinition {
                name: def.name,
                first: existing.span.start.clone(),
                second: def.span.start,
            });
        }
        if let Some(first) = self.first_definition(&def.name) {
            return Err(SemanticError::ConflictingDefinition {
                name: def.name,
                first,
                second: def.span.start,
            });
        }
        self.enums.insert(def.name.clone(), def);
        Ok(())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(name: &str) -> TypeRef {
        TypeRef::new(name, 0, SourceSpan::dummy())
    }

    #[test]
    fn test_builtins_are_seeded() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.builtin("void"), Some(&TypeDescriptor::Void));
        assert_eq!(
            registry.builtin("unsigned long"),
            Some(&TypeDescriptor::Int {
                width: IntWidth::W64,
                signed: false
            })
        );
        assert_eq!(
            registry.builtin("uint32_t"),
            Some(&TypeDescriptor::Int {
                width: IntWidth::W32,
                signed: false
            })
        );
        // owned by the resolver's override table, not the registry
        assert_eq!(registry.builtin("uint8_t"), None);
    }

    #[test]
    fn test_resolve_alias_is_one_hop_only() {
        let mut registry = TypeRegistry::new();
        registry
            .define_alias("funny", alias("int"), SourceSpan::dummy())
            .unwrap();
        registry
            .define_alias("funny2", alias("funny"), SourceSpan::dummy())
            .unwrap();

        // one hop: funny2 -> funny, never funny2 -> int
        assert_eq!(registry.resolve_alias("funny2").unwrap().name, "funny");
        assert_eq!(registry.resolve_alias("funny").unwrap().name, "int");
        assert!(registry.resolve_alias("int").is_none());
    }

    #[test]
    fn test_identical_redefinition_is_a_noop() {
        let mut registry = TypeRegistry::new();
        registry
            .define_alias("myint", alias("int"), SourceSpan::dummy())
            .unwrap();
        assert!(registry
            .define_alias("myint", alias("int"), SourceSpan::dummy())
            .is_ok());
    }

    #[test]
    fn test_conflicting_redefinition_is_an_error() {
        let mut registry = TypeRegistry::new();
        registry
            .define_alias("myint", alias("int"), SourceSpan::dummy())
            .unwrap();
        let err = registry
            .define_alias("myint", alias("char"), SourceSpan::dummy())
            .unwrap_err();
        assert!(matches!(err, SemanticError::ConflictingDefinition { .. }));
        // first-seen wins: the original target survives
        assert_eq!(registry.resolve_alias("myint").unwrap().name, "int");
    }

    #[test]
    fn test_alias_shadowing_builtin_is_a_conflict() {
        let mut registry = TypeRegistry::new();
        let err = registry
            .define_alias("uint32_t", alias("char"), SourceSpan::dummy())
            .unwrap_err();
        match err {
            SemanticError::ConflictingDefinition { first, .. } => {
                assert_eq!(first, SourceLocation::predefined());
            }
            other => panic!("Expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_namespaces_are_shared() {
        let mut registry = TypeRegistry::new();
        registry
            .define_struct(StructDefinition {
                name: "point".to_string(),
                fields: vec![],
                span: SourceSpan::dummy(),
            })
            .unwrap();
        assert!(registry
            .define_alias("point", alias("int"), SourceSpan::dummy())
            .is_err());
        assert!(registry.contains("point"));
    }
}
