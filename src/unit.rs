//! Compilation unit API.
//!
//! A [`CompilationUnit`] owns everything derived from one program: its
//! symbol table, the analysis diagnostics, the IR and the Jasmin text. Each
//! stage runs at most once; later calls return the cached result.
//!
//! # Example
//!
//! ```ignore
//! let mut unit = CompilationUnit::new(program, CompilerOptions::default());
//!
//! for diagnostic in unit.analyze()?.iter() {
//!     eprintln!("{}", diagnostic);
//! }
//! let jasmin = unit.jasmin()?;
//! ```

use bumpalo::Bump;
use jmm_ast::{AstBuilder, AstError, Program, TaggedNode};
use jmm_compiler::{AnalysisEngine, BytecodeEmitter, IrClass, IrGenerator, SymbolTable};
use jmm_core::{CompilationError, Diagnostic, Diagnostics};

use crate::options::CompilerOptions;

/// One program on its way to Jasmin.
pub struct CompilationUnit<'ast> {
    /// The program being compiled
    program: &'ast Program<'ast>,

    /// Declarations of the program, built on creation
    table: SymbolTable,

    options: CompilerOptions,

    /// Analysis result (available after `analyze`)
    diagnostics: Option<Diagnostics>,

    /// Lowered class (available after `ir`)
    ir: Option<IrClass>,

    /// Emitted text (available after `jasmin`)
    jasmin: Option<String>,
}

impl<'ast> CompilationUnit<'ast> {
    /// Create a unit for `program`, building its symbol table.
    pub fn new(program: &'ast Program<'ast>, options: CompilerOptions) -> Self {
        Self {
            program,
            table: SymbolTable::from_program(program),
            options,
            diagnostics: None,
            ir: None,
            jasmin: None,
        }
    }

    /// Convert a tagged tree into the typed AST, allocating in `arena`, and
    /// create a unit for it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Ast`] when the tree is malformed.
    pub fn from_tagged(
        arena: &'ast Bump,
        root: &TaggedNode,
        options: CompilerOptions,
    ) -> Result<Self, BuildError> {
        let program = AstBuilder::new(arena).program_from_tagged(root)?;
        Ok(Self::new(program, options))
    }

    pub fn program(&self) -> &'ast Program<'ast> {
        self.program
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Run every analysis pass.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Compilation`] only for broken internal
    /// invariants; problems in the program are reported as diagnostics.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze(&mut self) -> Result<&Diagnostics, BuildError> {
        let diagnostics = match self.diagnostics.take() {
            Some(diagnostics) => diagnostics,
            None => {
                let engine = AnalysisEngine::standard(self.options.this_forbidden_in());
                let diagnostics = engine.run(self.program, &self.table)?;
                tracing::debug!(
                    errors = diagnostics.error_count(),
                    warnings = diagnostics.warning_count(),
                    "analysis finished"
                );
                diagnostics
            }
        };
        Ok(self.diagnostics.insert(diagnostics))
    }

    /// Lower the program to IR. Does not depend on analysis.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn ir(&mut self) -> Result<&IrClass, BuildError> {
        let ir = match self.ir.take() {
            Some(ir) => ir,
            None => IrGenerator::new(&self.table).generate(self.program)?,
        };
        Ok(self.ir.insert(ir))
    }

    /// Emit the Jasmin text of the class.
    ///
    /// # Errors
    ///
    /// With `abort_on_semantic_errors` set, returns
    /// [`BuildError::SemanticErrors`] while analysis reports any error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn jasmin(&mut self) -> Result<&str, BuildError> {
        let text = match self.jasmin.take() {
            Some(text) => text,
            None => self.emit()?,
        };
        Ok(self.jasmin.insert(text))
    }

    fn emit(&mut self) -> Result<String, BuildError> {
        if self.options.abort_on_semantic_errors {
            let diagnostics = self.analyze()?;
            if diagnostics.has_errors() {
                return Err(BuildError::SemanticErrors(
                    diagnostics.errors().cloned().collect(),
                ));
            }
        }
        let emitter_options = self.options.emitter_options();
        let class = self.ir()?;
        let mut emitter = BytecodeEmitter::new(class, emitter_options);
        Ok(emitter.build()?.to_string())
    }
}

/// Errors that can occur while compiling a unit.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The tagged input could not be converted
    #[error(transparent)]
    Ast(#[from] AstError),

    /// An internal invariant was broken
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// Analysis reported errors and the options forbid emitting anyway
    #[error("{} semantic error(s)", .0.len())]
    SemanticErrors(Vec<Diagnostic>),
}
