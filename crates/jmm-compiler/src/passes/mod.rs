//! Semantic analysis.
//!
//! The [`AnalysisEngine`] runs an ordered list of [`AnalysisPass`]es over a
//! program. Passes are independent of one another: each one reads the AST
//! and the [`SymbolTable`] and appends diagnostics, and the engine always runs
//! every pass. Diagnostics come out in pass order, then in visitation order
//! within a pass.
//!
//! - [`declarations`]: duplicate names, shadowing, varargs placement
//! - [`names`]: undeclared variables and methods
//! - [`calls`]: call arity and argument types
//! - [`assignment`]: assignment and return compatibility
//! - [`operators`]: operand types, conditions, array indexing
//! - [`this_usage`]: `this` in static and entry methods
//!
//! Checks whose operand resolves to the unknown type are skipped.

pub mod assignment;
pub mod calls;
pub mod declarations;
pub mod names;
pub mod operators;
pub mod this_usage;

use jmm_ast::{MethodDecl, Program};
use jmm_core::{Diagnostics, JmmType, Result};

use crate::context::{MethodContext, method_contexts};
use crate::symbol_table::SymbolTable;

pub use assignment::{AssignmentCompatibility, ReturnCompatibility};
pub use calls::MethodCallArity;
pub use declarations::{DuplicateDeclarations, VarargsPlacement};
pub use names::{UndeclaredMethod, UndeclaredVariable};
pub use operators::{ArrayIndexType, BinaryOperandCompatibility, ConditionExpression};
pub use this_usage::ThisUsage;

/// One semantic check over a whole program.
pub trait AnalysisPass {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Append this pass's diagnostics for `program`.
    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()>;
}

/// Runs analysis passes in order and collects their diagnostics.
#[derive(Default)]
pub struct AnalysisEngine {
    passes: Vec<Box<dyn AnalysisPass>>,
}

impl AnalysisEngine {
    /// An engine with no passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full pass list. `entry_method`, when given, names the method in
    /// which `this` is also forbidden.
    pub fn standard(entry_method: Option<&str>) -> Self {
        Self::new()
            .with_pass(DuplicateDeclarations)
            .with_pass(VarargsPlacement)
            .with_pass(UndeclaredVariable)
            .with_pass(UndeclaredMethod)
            .with_pass(MethodCallArity)
            .with_pass(AssignmentCompatibility)
            .with_pass(BinaryOperandCompatibility)
            .with_pass(ConditionExpression)
            .with_pass(ArrayIndexType)
            .with_pass(ReturnCompatibility)
            .with_pass(ThisUsage::new(entry_method.map(str::to_string)))
    }

    /// Append a pass to the end of the list.
    pub fn with_pass(mut self, pass: impl AnalysisPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|pass| pass.name())
    }

    /// Run every pass over `program`.
    #[tracing::instrument(skip_all, fields(class = table.class_name()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
    ) -> Result<Diagnostics> {
        let mut diagnostics = Diagnostics::new();
        for pass in &self.passes {
            let before = diagnostics.len();
            pass.run(program, table, &mut diagnostics)?;
            tracing::debug!(
                pass = pass.name(),
                reported = diagnostics.len() - before,
                "analysis pass finished"
            );
        }
        Ok(diagnostics)
    }
}

/// Call `check` for every method body with its context.
pub(crate) fn check_bodies<'ast, F>(
    program: &'ast Program<'ast>,
    table: &SymbolTable,
    diagnostics: &mut Diagnostics,
    mut check: F,
) -> Result<()>
where
    F: FnMut(&'ast MethodDecl<'ast>, MethodContext<'_>, &mut Diagnostics),
{
    for (decl, cx) in method_contexts(program, table)? {
        check(decl, cx, diagnostics);
    }
    Ok(())
}

/// Whether a value of type `source` may be stored where `target` is declared.
///
/// Equal types always match. Between class types, the unit's class is
/// accepted for its declared superclass, and two imported classes are
/// assumed compatible since nothing is known about them.
pub(crate) fn is_assignable(table: &SymbolTable, target: &JmmType, source: &JmmType) -> bool {
    if target == source {
        return true;
    }
    if !target.is_class() || !source.is_class() {
        return false;
    }
    table.is_subclass_of(&source.base_name, &target.base_name)
        || (table.is_imported(&target.base_name) && table.is_imported(&source.base_name))
}
