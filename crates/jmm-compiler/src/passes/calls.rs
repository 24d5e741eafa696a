//! Argument checks for calls to methods declared in the class.

use jmm_ast::visitor::{Visitor, walk_call};
use jmm_ast::{CallExpr, Expr, Program};
use jmm_core::{Diagnostic, Diagnostics, JmmType, Result};

use super::{AnalysisPass, check_bodies};
use crate::context::MethodContext;
use crate::symbol_table::{MethodSignature, SymbolTable};

/// Argument count and argument types of calls to locally declared methods.
///
/// Without varargs the count must match exactly. With a trailing varargs
/// parameter any count of at least the fixed parameters is accepted, and the
/// trailing arguments must each have the element type, unless a single
/// trailing argument already has the array type.
pub struct MethodCallArity;

impl AnalysisPass for MethodCallArity {
    fn name(&self) -> &'static str {
        "MethodCallArity"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            CallChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct CallChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl CallChecker<'_, '_> {
    fn check_call(&mut self, call: &CallExpr<'_>, callee: &MethodSignature) {
        let args = call.args;
        let fixed = callee.fixed_arity();
        let count_ok = if callee.varargs {
            args.len() >= fixed
        } else {
            args.len() == fixed
        };
        if !count_ok {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                call.span,
                "The number of parameters are not the same",
            ));
            return;
        }

        for (position, (arg, param)) in args.iter().zip(&callee.params[..fixed]).enumerate() {
            self.check_argument(call, position, arg, &param.ty);
        }

        let trailing = &args[fixed..];
        let (Some(array_type), Some(element)) = (
            callee.params.last().filter(|_| callee.varargs).map(|p| &p.ty),
            callee.varargs_element(),
        ) else {
            return;
        };
        if let [single] = trailing
            && self.cx.type_of(single) == *array_type
        {
            return;
        }
        for (offset, arg) in trailing.iter().enumerate() {
            self.check_argument(call, fixed + offset, arg, &element);
        }
    }

    fn check_argument(
        &mut self,
        call: &CallExpr<'_>,
        position: usize,
        arg: &Expr<'_>,
        expected: &JmmType,
    ) {
        let found = self.cx.type_of(arg);
        if found.is_unknown() || found == *expected {
            return;
        }
        self.diagnostics.add_diagnostic(Diagnostic::error(
            arg.span(),
            format!(
                "Argument {} of call to '{}' has type '{}' but '{}' is expected",
                position + 1,
                call.method.name,
                found,
                expected
            ),
        ));
    }
}

impl<'ast> Visitor<'ast> for CallChecker<'_, '_> {
    fn visit_call(&mut self, call: &'ast CallExpr<'ast>) {
        if let Some(callee) = self.cx.resolver().local_callee(call, self.cx.method) {
            self.check_call(call, callee);
        }
        walk_call(self, call);
    }
}
