//! Per-method traversal context.
//!
//! Passes and lowering receive the enclosing method explicitly instead of
//! tracking it in mutable state.

use jmm_ast::{Expr, MethodDecl, Program};
use jmm_core::{CompilationError, JmmType, Result};

use crate::symbol_table::{MethodSignature, SymbolTable, VarLookup};
use crate::type_resolver::TypeResolver;

/// The symbol table together with the method being visited.
#[derive(Debug, Clone, Copy)]
pub struct MethodContext<'a> {
    pub table: &'a SymbolTable,
    pub method: &'a MethodSignature,
}

impl<'a> MethodContext<'a> {
    pub fn new(table: &'a SymbolTable, method: &'a MethodSignature) -> Self {
        Self { table, method }
    }

    pub fn resolver(&self) -> TypeResolver<'a> {
        TypeResolver::new(self.table)
    }

    /// Static type of `expr` inside this method.
    pub fn type_of(&self, expr: &Expr<'_>) -> JmmType {
        self.resolver().resolve(expr, self.method)
    }

    pub fn lookup(&self, name: &str) -> Option<VarLookup<'a>> {
        self.table.lookup_variable(name, self.method)
    }

    pub fn method_name(&self) -> &'a str {
        &self.method.name
    }

    pub fn is_static(&self) -> bool {
        self.method.is_static
    }
}

/// Pair every method declaration of `program` with its context, in
/// declaration order.
///
/// Fails when the table was not built from `program`.
pub fn method_contexts<'a, 'ast>(
    program: &'ast Program<'ast>,
    table: &'a SymbolTable,
) -> Result<Vec<(&'ast MethodDecl<'ast>, MethodContext<'a>)>> {
    program
        .class
        .methods
        .iter()
        .enumerate()
        .map(|(index, decl)| {
            let signature = table.signatures().get(index).ok_or_else(|| {
                CompilationError::MissingContext {
                    what: format!("symbol table entry for method '{}'", decl.name.name),
                }
            })?;
            Ok((decl, MethodContext::new(table, signature)))
        })
        .collect()
}
