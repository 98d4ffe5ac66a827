//! Semantic layer: registry population, type resolution, symbol assembly
//!
//! Declarations are processed strictly in unit order, interleaving
//! registry updates with resolution. A type referenced before its
//! typedef or struct is seen is an error, never deferred and retried.

pub mod errors;
pub mod registry;
pub mod resolver;
pub mod symbols;

pub use errors::SemanticError;
pub use registry::{TypeRegistry, TypedefEntry};
pub use resolver::TypeResolver;
pub use symbols::{Symbol, SymbolTable};

use crate::parser::{RawDeclaration, RawEnum, RawFunction, RawStruct};
use crate::types::{
    EnumDefinition, EnumVariant, FunctionSignature, Parameter, StructDefinition, StructField,
    TypeRef,
};
use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};

/// Processes one unit's parsed declarations into a registry and symbol
/// table owned by the surrounding analysis run.
pub struct UnitAnalyzer<'a> {
    registry: &'a mut TypeRegistry,
    symbols: &'a mut SymbolTable,
}

impl<'a> UnitAnalyzer<'a> {
    pub fn new(registry: &'a mut TypeRegistry, symbols: &'a mut SymbolTable) -> Self {
        Self { registry, symbols }
    }

    /// Process declarations in order. Fail-fast: the first error aborts
    /// the unit; declarations already processed stay in place.
    pub fn process(&mut self, declarations: Vec<RawDeclaration>) -> Result<(), AnalyzerError> {
        for declaration in declarations {
            self.process_declaration(declaration)?;
        }
        Ok(())
    }

    fn process_declaration(&mut self, declaration: RawDeclaration) -> Result<(), AnalyzerError> {
        match declaration {
            RawDeclaration::Typedef { name, target, span } => {
                self.process_typedef(name, target, span)
            }
            RawDeclaration::Struct(raw) => self.process_struct(raw),
            RawDeclaration::Enum(raw) => self.process_enum(raw),
            RawDeclaration::Function(raw) => self.process_function(raw),
        }
    }

    fn process_typedef(
        &mut self,
        name: String,
        target: TypeRef,
        span: SourceSpan,
    ) -> Result<(), AnalyzerError> {
        // Preprocessed units restate the stdint typedefs in place.
        // Restating a builtin with its own meaning is a no-op; giving it
        // a different one is a conflict.
        if let Some(builtin) = self.registry.builtin(&name) {
            let builtin = builtin.clone();
            let resolved = TypeResolver::new(self.registry).resolve(&target, &name)?;
            if resolved == builtin {
                return Ok(());
            }
            return Err(SemanticError::ConflictingDefinition {
                name,
                first: SourceLocation::predefined(),
                second: span.start,
            }
            .into());
        }

        // `typedef struct point point;` - C keeps tags in their own
        // namespace; here the self-alias is simply a no-op
        if target.name == name
            && target.pointer_depth == 0
            && self.registry.struct_def(&name).is_some()
        {
            return Ok(());
        }

        self.registry
            .define_alias(&name, target, span.clone())?;

        // Resolve the alias name itself (not its target) so override
        // rules keyed on the declared name apply to the recorded symbol.
        let self_ref = TypeRef::new(name.clone(), 0, span.clone());
        let resolved = TypeResolver::new(self.registry).resolve(&self_ref, &name)?;
        self.symbols.insert(Symbol::TypedefAlias {
            name,
            target: resolved,
            span,
        })?;
        Ok(())
    }

    fn process_struct(&mut self, raw: RawStruct) -> Result<(), AnalyzerError> {
        let mut fields = Vec::with_capacity(raw.fields.len());
        let resolver = TypeResolver::new(self.registry);
        for field in &raw.fields {
            let ty = resolver.resolve(&field.ty, &raw.name)?;
            fields.push(StructField {
                name: field.name.clone(),
                ty,
            });
        }

        let definition = StructDefinition {
            name: raw.name,
            fields,
            span: raw.span,
        };
        self.registry.define_struct(definition.clone())?;
        self.symbols.insert(Symbol::Struct(definition))?;
        Ok(())
    }

    fn process_enum(&mut self, raw: RawEnum) -> Result<(), AnalyzerError> {
        let definition = EnumDefinition {
            name: raw.name,
            variants: raw
                .variants
                .into_iter()
                .map(|v| EnumVariant {
                    name: v.name,
                    value: v.value,
                })
                .collect(),
            span: raw.span,
        };
        // registry only: enum-typed references resolve to int, but the
        // symbol table's entries are functions, structs, and typedefs
        self.registry.define_enum(definition)?;
        Ok(())
    }

    fn process_function(&mut self, raw: RawFunction) -> Result<(), AnalyzerError> {
        let resolver = TypeResolver::new(self.registry);
        let return_type = resolver.resolve(&raw.return_type, &raw.name)?;

        let mut params = Vec::with_capacity(raw.params.len());
        for param in &raw.params {
            let ty = resolver.resolve(&param.ty, &raw.name)?;
            params.push(Parameter {
                name: param.name.clone(),
                ty,
            });
        }

        self.symbols.insert(Symbol::Function(FunctionSignature {
            name: raw.name,
            return_type,
            params,
            is_variadic: raw.is_variadic,
            span: raw.span,
        }))?;
        Ok(())
    }
}
