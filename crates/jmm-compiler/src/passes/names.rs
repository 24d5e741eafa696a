//! Name resolution checks for variables and methods.

use jmm_ast::visitor::{Visitor, walk_call};
use jmm_ast::{CallExpr, Expr, Ident, Program};
use jmm_core::{Diagnostic, Diagnostics, Result};

use super::{AnalysisPass, check_bodies};
use crate::context::MethodContext;
use crate::symbol_table::SymbolTable;

/// An identifier in a method body must name a visible variable, an import,
/// or the class itself.
pub struct UndeclaredVariable;

impl AnalysisPass for UndeclaredVariable {
    fn name(&self) -> &'static str {
        "UndeclaredVariable"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            VariableChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct VariableChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl<'ast> Visitor<'ast> for VariableChecker<'_, '_> {
    fn visit_ident(&mut self, ident: &'ast Ident<'ast>) {
        if self.cx.lookup(ident.name).is_none() && !self.cx.table.is_known_class(ident.name) {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                ident.span,
                format!("Variable '{}' does not exist.", ident.name),
            ));
        }
    }
}

/// A called method must be declared in the class.
///
/// Calls on receivers of another class type, and every call in a class that
/// declares a superclass, are accepted: the callee may be inherited or
/// external and cannot be checked here.
pub struct UndeclaredMethod;

impl AnalysisPass for UndeclaredMethod {
    fn name(&self) -> &'static str {
        "UndeclaredMethod"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if table.super_class().is_some() {
            return Ok(());
        }
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            MethodChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct MethodChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl MethodChecker<'_, '_> {
    fn must_be_declared(&self, call: &CallExpr<'_>) -> bool {
        match call.receiver.map(|receiver| receiver.unparenthesized()) {
            None | Some(Expr::This(_)) => true,
            Some(receiver) => {
                let ty = self.cx.type_of(receiver);
                if ty.is_unknown() {
                    return false;
                }
                !ty.is_class() || ty.base_name == self.cx.table.class_name()
            }
        }
    }
}

impl<'ast> Visitor<'ast> for MethodChecker<'_, '_> {
    fn visit_call(&mut self, call: &'ast CallExpr<'ast>) {
        if !self.cx.table.has_method(call.method.name) && self.must_be_declared(call) {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                call.method.span,
                format!("Method '{}' does not exist.", call.method.name),
            ));
        }
        walk_call(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, run, single_method};
    use bumpalo::Bump;
    use jmm_ast::{AstBuilder, MethodModifiers};

    #[test]
    fn reports_unknown_identifiers_only() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = single_method(
            &arena,
            &[b.var_decl(b.int_type(), "l")],
            &[
                b.assign(b.var("l"), b.binary(b.var("x"), jmm_ast::BinaryOp::Add, b.var("p"))),
                b.expr_stmt(b.call(Some(b.var("Printer")), "println", &[b.var("ghost")])),
            ],
        );

        let diagnostics = run(&UndeclaredVariable, program);
        assert_eq!(messages(&diagnostics), vec!["Variable 'ghost' does not exist."]);
    }

    #[test]
    fn fields_are_undeclared_in_static_methods() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = b.method(
            "main",
            MethodModifiers::PUBLIC | MethodModifiers::STATIC,
            b.void_type(),
            &[],
            &[],
            &[b.expr_stmt(b.var("x"))],
        );
        let program = crate::passes::test_support::with_methods(&arena, &[main]);

        let diagnostics = run(&UndeclaredVariable, program);
        assert_eq!(messages(&diagnostics), vec!["Variable 'x' does not exist."]);
    }

    #[test]
    fn undeclared_method_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = single_method(
            &arena,
            &[
                b.var_decl(b.class_type("Printer"), "printer"),
                b.var_decl(b.class_type("A"), "other"),
            ],
            &[
                b.expr_stmt(b.call(None, "m", &[b.int(1)])),
                b.expr_stmt(b.call(None, "nope", &[])),
                b.expr_stmt(b.call(Some(b.this()), "alsoNope", &[])),
                b.expr_stmt(b.call(Some(b.var("other")), "stillNope", &[])),
                b.expr_stmt(b.call(Some(b.var("printer")), "print", &[])),
                b.expr_stmt(b.call(Some(b.var("Printer")), "println", &[])),
                b.expr_stmt(b.call(Some(b.var("p")), "onInt", &[])),
                b.expr_stmt(b.call(Some(b.var("unknown")), "whatever", &[])),
            ],
        );

        let diagnostics = run(&UndeclaredMethod, program);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Method 'nope' does not exist.",
                "Method 'alsoNope' does not exist.",
                "Method 'stillNope' does not exist.",
                "Method 'onInt' does not exist.",
            ]
        );
    }

    #[test]
    fn superclass_disables_method_check() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let method = b.method(
            "m",
            MethodModifiers::PUBLIC,
            b.void_type(),
            &[],
            &[],
            &[b.expr_stmt(b.call(None, "inherited", &[]))],
        );
        let class = b.class("A", Some("Base"), &[], &[method]);
        let program = b.program(&[], class);

        assert!(run(&UndeclaredMethod, program).is_empty());
    }
}
