//! Header Binding Analyzer
//!
//! Turns preprocessed C header text into a canonical symbol table for a
//! foreign-function binding generator:
//! - Lexer: header text to declaration tokens
//! - Parser: tokens to an unresolved declaration tree
//! - Semantic: type registry, alias-chain resolution, symbol assembly
//!
//! The analyzer is a pure transformation: text in, [`SymbolTable`] out.
//! Reading files, expanding macros, and emitting binding code are its
//! callers' business.

pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod types;

pub use hbind_common::{AnalyzerError, SourceLocation, SourceSpan};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser, RawDeclaration};
pub use semantic::{
    SemanticError, Symbol, SymbolTable, TypeRegistry, TypeResolver, UnitAnalyzer,
};
pub use types::{
    EnumDefinition, EnumVariant, FloatWidth, FunctionSignature, IntWidth, Parameter,
    StructDefinition, StructField, TypeDescriptor, TypeRef,
};

/// One analysis run: a type registry and symbol table fed by header
/// units in caller-determined order. Later units may reference typedefs
/// and structs defined by earlier ones.
pub struct Analyzer {
    registry: TypeRegistry,
    symbols: SymbolTable,
}

/// Outcome of analyzing a batch of units: the table built from every
/// unit that succeeded, plus the errors of those that did not.
#[derive(Debug)]
pub struct Analysis {
    pub table: SymbolTable,
    pub errors: Vec<AnalyzerError>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            symbols: SymbolTable::new(),
        }
    }

    /// Analyze one header unit. Fail-fast: the first malformed
    /// declaration aborts the unit; symbols inserted before the failure
    /// stay in the table.
    pub fn analyze_unit(&mut self, unit: &str, source: &str) -> Result<(), AnalyzerError> {
        let declarations = Parser::from_source(unit, source)?.parse_unit()?;
        UnitAnalyzer::new(&mut self.registry, &mut self.symbols).process(declarations)
    }

    /// Analyze a batch of units in order, collecting per-unit errors.
    /// A failing unit never prevents later units from being processed;
    /// the caller decides whether a partial table is usable.
    pub fn analyze_units<'u>(
        &mut self,
        units: impl IntoIterator<Item = (&'u str, &'u str)>,
    ) -> Vec<AnalyzerError> {
        units
            .into_iter()
            .filter_map(|(unit, source)| self.analyze_unit(unit, source).err())
            .collect()
    }

    /// Run a fresh analysis over a batch of units.
    pub fn analyze<'u>(units: impl IntoIterator<Item = (&'u str, &'u str)>) -> Analysis {
        let mut analyzer = Self::new();
        let errors = analyzer.analyze_units(units);
        Analysis {
            table: analyzer.into_table(),
            errors,
        }
    }

    /// Analyze a single anonymous unit.
    pub fn analyze_source(source: &str) -> Result<SymbolTable, AnalyzerError> {
        let mut analyzer = Self::new();
        analyzer.analyze_unit("<input>", source)?;
        Ok(analyzer.into_table())
    }

    pub fn table(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_table(self) -> SymbolTable {
        self.symbols
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// The declarations of the original `simple.h` fixture, as the
    /// preprocessor leaves them.
    const SIMPLE_H: &str = r#"
void no_type();

int binnum(int a, int b);

char* split(char* str, char* delim);
char* to_string(int num);
int to_int(char* str);
bool is_prime(int num);

uint8_t* to_bytes(int num);

typedef struct {
    int x;
    int y;
} point;

point* make_point(int x, int y);

long long weird_types(unsigned long int a, long long int b, unsigned int c);
"#;

    const SYMBOLTEST_H: &str = r#"
int func(int a, int b);
void func2();
char* func3(char* str, char* delim);
char* func4(int num);
int func5(char* str);
float func6(int num);

// uint8_t is spelled as an alias of char here, but the declared name
// carries the explicit width: func7 returns u8, not char.
typedef char uint8_t;
uint8_t func7(int num);
"#;

    fn int32() -> TypeDescriptor {
        TypeDescriptor::Int {
            width: IntWidth::W32,
            signed: true,
        }
    }

    fn function<'t>(table: &'t SymbolTable, name: &str) -> &'t FunctionSignature {
        match table.get(name) {
            Some(Symbol::Function(func)) => func,
            other => panic!("Expected function {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_header_end_to_end() {
        init_logs();
        let table = Analyzer::analyze_source(SIMPLE_H).unwrap();

        let no_type = function(&table, "no_type");
        assert_eq!(no_type.return_type, TypeDescriptor::Void);
        assert!(no_type.params.is_empty());

        let binnum = function(&table, "binnum");
        assert_eq!(binnum.return_type, int32());
        assert_eq!(binnum.params.len(), 2);

        let split = function(&table, "split");
        assert_eq!(split.return_type, TypeDescriptor::CString);
        assert_eq!(split.params[0].ty, TypeDescriptor::CString);
        assert_eq!(split.params[1].ty, TypeDescriptor::CString);

        let is_prime = function(&table, "is_prime");
        assert_eq!(is_prime.return_type, TypeDescriptor::Bool);

        let to_bytes = function(&table, "to_bytes");
        assert_eq!(to_bytes.return_type, TypeDescriptor::Bytes);

        let make_point = function(&table, "make_point");
        assert_eq!(
            make_point.return_type,
            TypeDescriptor::Named("point".to_string()).wrapped(1)
        );

        match table.get("point").unwrap() {
            Symbol::Struct(def) => {
                assert_eq!(def.fields.len(), 2);
                assert_eq!(def.fields[0].name, "x");
                assert_eq!(def.fields[0].ty, int32());
                assert_eq!(def.fields[1].name, "y");
                assert_eq!(def.fields[1].ty, int32());
            }
            other => panic!("Expected struct, got {other:?}"),
        }

        let weird = function(&table, "weird_types");
        assert_eq!(
            weird.return_type,
            TypeDescriptor::Int {
                width: IntWidth::W64,
                signed: true
            }
        );
        assert_eq!(weird.params.len(), 3);
        assert_eq!(
            weird.params[0].ty,
            TypeDescriptor::Int {
                width: IntWidth::W64,
                signed: false
            }
        );
        assert_eq!(
            weird.params[1].ty,
            TypeDescriptor::Int {
                width: IntWidth::W64,
                signed: true
            }
        );
        assert_eq!(
            weird.params[2].ty,
            TypeDescriptor::Int {
                width: IntWidth::W32,
                signed: false
            }
        );
        assert!(!weird.is_variadic);

        // binding generators iterate functions in declaration order
        let names: Vec<_> = table.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "no_type",
                "binnum",
                "split",
                "to_string",
                "to_int",
                "is_prime",
                "to_bytes",
                "make_point",
                "weird_types",
            ]
        );
    }

    #[test]
    fn test_symboltest_header_uint8_is_not_char() {
        init_logs();
        let table = Analyzer::analyze_source(SYMBOLTEST_H).unwrap();

        let func7 = function(&table, "func7");
        assert_eq!(
            func7.return_type,
            TypeDescriptor::Int {
                width: IntWidth::W8,
                signed: false
            }
        );

        // alias transparency holds everywhere the override does not apply
        let func3 = function(&table, "func3");
        assert_eq!(func3.return_type, TypeDescriptor::CString);
        let func6 = function(&table, "func6");
        assert_eq!(
            func6.return_type,
            TypeDescriptor::Float {
                width: FloatWidth::W32
            }
        );
    }

    #[test]
    fn test_analyzing_the_same_unit_twice_is_idempotent() {
        let mut analyzer = Analyzer::new();
        analyzer.analyze_unit("simple.h", SIMPLE_H).unwrap();
        let first = analyzer.table().clone();

        analyzer.analyze_unit("simple.h", SIMPLE_H).unwrap();
        assert_eq!(analyzer.table(), &first);
    }

    #[test]
    fn test_cross_unit_typedef_visibility() {
        let mut analyzer = Analyzer::new();
        analyzer
            .analyze_unit("types.h", "typedef unsigned long size_t;")
            .unwrap();
        analyzer
            .analyze_unit("alloc.h", "void* alloc(size_t size);")
            .unwrap();

        let alloc = function(analyzer.table(), "alloc");
        assert_eq!(
            alloc.params[0].ty,
            TypeDescriptor::Int {
                width: IntWidth::W64,
                signed: false
            }
        );
    }

    #[test]
    fn test_cross_unit_conflict_names_both_units() {
        let mut analyzer = Analyzer::new();
        analyzer
            .analyze_unit("a.h", "int convert(char* text);")
            .unwrap();
        let err = analyzer
            .analyze_unit("b.h", "float convert(char* text);")
            .unwrap_err();

        match err {
            AnalyzerError::Conflict {
                identifier,
                first,
                second,
            } => {
                assert_eq!(identifier, "convert");
                assert_eq!(first.unit, "a.h");
                assert_eq!(second.unit, "b.h");
            }
            other => panic!("Expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_success_over_units() {
        let analysis = Analyzer::analyze([
            ("good.h", "int first(int a);"),
            ("bad.h", "int second(unknown_t u);"),
            ("later.h", "int third(bool b);"),
        ]);

        assert!(!analysis.is_clean());
        assert_eq!(analysis.errors.len(), 1);
        assert!(matches!(
            analysis.errors[0],
            AnalyzerError::UnresolvedType { .. }
        ));
        // the failing unit neither erases earlier results nor blocks
        // later units
        assert!(analysis.table.get("first").is_some());
        assert!(analysis.table.get("third").is_some());
        assert!(analysis.table.get("second").is_none());
    }

    #[test]
    fn test_variadic_prototype_end_to_end() {
        let table =
            Analyzer::analyze_source("int log_all(char* fmt, ...);").unwrap();
        let log_all = function(&table, "log_all");
        assert!(log_all.is_variadic);
        assert_eq!(log_all.params.len(), 1);
    }

    #[test]
    fn test_typedef_cycle_reports_cycle_error() {
        // the parser accepts both typedefs (each name is just an
        // identifier in type position); resolution catches the loop
        let mut analyzer = Analyzer::new();
        let err = analyzer
            .analyze_unit(
                "cycle.h",
                "typedef a b;\ntypedef b a;\nint use_it(a value);",
            )
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::UnresolvedType { .. } | AnalyzerError::Cycle { .. }));
    }

    #[test]
    fn test_alias_chain_through_known_names_cycles() {
        // `typedef b a;` is resolvable only once b exists; to exercise
        // the cycle detector the chain must close over defined names
        let mut registry = TypeRegistry::new();
        registry
            .define_alias(
                "a",
                TypeRef::new("b", 0, SourceSpan::dummy()),
                SourceSpan::dummy(),
            )
            .unwrap();
        registry
            .define_alias(
                "b",
                TypeRef::new("a", 0, SourceSpan::dummy()),
                SourceSpan::dummy(),
            )
            .unwrap();

        let err = TypeResolver::new(&registry)
            .resolve(&TypeRef::new("a", 0, SourceSpan::dummy()), "use_it")
            .unwrap_err();
        assert!(matches!(err, SemanticError::AliasCycle { .. }));
    }

    #[test]
    fn test_lex_error_surfaces_from_facade() {
        let mut analyzer = Analyzer::new();
        let err = analyzer.analyze_unit("bad.h", "int f(int a) @;").unwrap_err();
        assert!(matches!(err, AnalyzerError::Lex { .. }));
    }

    #[test]
    fn test_symbol_table_serializes_to_json() {
        let table = Analyzer::analyze_source("char* greet(char* name);").unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let back: SymbolTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        assert_eq!(function(&back, "greet").return_type, TypeDescriptor::CString);
    }
}
