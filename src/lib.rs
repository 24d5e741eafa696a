//! Java-- to Jasmin compiler.
//!
//! Takes an already-parsed Java-- program (either typed, built with
//! [`AstBuilder`], or in the generic [`TaggedNode`] form), checks it, lowers
//! it to a three-address IR and emits Jasmin assembly for the JVM.
//!
//! Analysis is advisory: diagnostics are reported, and code is generated
//! regardless unless [`CompilerOptions::abort_on_semantic_errors`] is set.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use jmm::{AstBuilder, CompilerOptions, MethodModifiers, compile};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let get = b.method(
//!     "get",
//!     MethodModifiers::PUBLIC,
//!     b.int_type(),
//!     &[],
//!     &[],
//!     &[b.ret(Some(b.var("x")))],
//! );
//! let class = b.class("Counter", None, &[b.var_decl(b.int_type(), "x")], &[get]);
//! let program = b.program(&[], class);
//!
//! let output = compile(program, CompilerOptions::default()).unwrap();
//! assert!(output.diagnostics.is_empty());
//! assert!(output.jasmin.contains("getfield Counter/x I"));
//! ```

pub mod options;
mod unit;

pub use options::CompilerOptions;
pub use unit::{BuildError, CompilationUnit};

// Re-export the stage crates' main types
pub use jmm_ast::{AstBuilder, AstError, MethodModifiers, Program, TaggedNode};
pub use jmm_compiler::{
    AnalysisEngine, BytecodeEmitter, EmitterOptions, IrClass, IrGenerator, SymbolTable,
};
pub use jmm_core::{CompilationError, Diagnostic, Diagnostics, JmmType, Span};

/// Everything a single compilation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationOutput {
    /// All analysis diagnostics, errors and warnings.
    pub diagnostics: Diagnostics,
    /// The Jasmin text of the class.
    pub jasmin: String,
}

/// Analyze `program` and emit its Jasmin text in one go.
///
/// # Errors
///
/// See [`CompilationUnit::analyze`] and [`CompilationUnit::jasmin`].
pub fn compile<'ast>(
    program: &'ast Program<'ast>,
    options: CompilerOptions,
) -> Result<CompilationOutput, BuildError> {
    let mut unit = CompilationUnit::new(program, options);
    let diagnostics = unit.analyze()?.clone();
    let jasmin = unit.jasmin()?.to_string();
    Ok(CompilationOutput {
        diagnostics,
        jasmin,
    })
}
