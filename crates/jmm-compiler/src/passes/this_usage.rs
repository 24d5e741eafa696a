//! Use of `this` where there is no receiver.

use jmm_ast::visitor::{Visitor, walk_call};
use jmm_ast::{CallExpr, Program, ThisExpr};
use jmm_core::{Diagnostic, Diagnostics, Result};

use super::{AnalysisPass, check_bodies};
use crate::context::MethodContext;
use crate::symbol_table::SymbolTable;

/// `this` is an error inside static methods and inside the entry method.
///
/// A static method also has no implicit receiver, so calling an instance
/// method of the class without one is reported too.
pub struct ThisUsage {
    entry_method: Option<String>,
}

impl ThisUsage {
    /// `entry_method`, when set, names the method where `this` is forbidden
    /// regardless of modifiers.
    pub fn new(entry_method: Option<String>) -> Self {
        Self { entry_method }
    }
}

impl AnalysisPass for ThisUsage {
    fn name(&self) -> &'static str {
        "ThisUsage"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            let in_entry = self.entry_method.as_deref() == Some(cx.method_name());
            let message = if in_entry {
                format!("This keyword cannot be used in {} method", cx.method_name())
            } else if cx.is_static() {
                "This keyword cannot be used in static methods".to_string()
            } else {
                return;
            };
            ThisChecker {
                cx,
                message,
                diagnostics,
            }
            .visit_method(decl);
        })
    }
}

struct ThisChecker<'a, 'd> {
    cx: MethodContext<'a>,
    message: String,
    diagnostics: &'d mut Diagnostics,
}

impl<'ast> Visitor<'ast> for ThisChecker<'_, '_> {
    fn visit_this(&mut self, this: &'ast ThisExpr) {
        self.diagnostics
            .add_diagnostic(Diagnostic::error(this.span, self.message.clone()));
    }

    fn visit_call(&mut self, call: &'ast CallExpr<'ast>) {
        if call.receiver.is_none()
            && self.cx.is_static()
            && let Some(callee) = self.cx.table.method(call.method.name)
            && !callee.is_static
        {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                call.span,
                format!(
                    "Instance method '{}' cannot be called from static method '{}'",
                    call.method.name,
                    self.cx.method_name()
                ),
            ));
        }
        walk_call(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, run, with_methods};
    use bumpalo::Bump;
    use jmm_ast::{AstBuilder, MethodModifiers};

    #[test]
    fn this_in_static_and_entry_methods() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.expr_stmt(b.call(Some(b.this()), "helper", &[]))];
        let statik = MethodModifiers::PUBLIC | MethodModifiers::STATIC;
        let methods = [
            b.method("main", statik, b.void_type(), &[], &[], &body),
            b.method("helper", statik, b.void_type(), &[], &[], &body),
            b.method("instance", MethodModifiers::PUBLIC, b.void_type(), &[], &[], &body),
        ];
        let program = with_methods(&arena, &methods);

        assert_eq!(
            messages(&run(&ThisUsage::new(Some("main".into())), program)),
            vec![
                "This keyword cannot be used in main method",
                "This keyword cannot be used in static methods",
            ]
        );
        assert_eq!(
            messages(&run(&ThisUsage::new(None), program)),
            vec![
                "This keyword cannot be used in static methods",
                "This keyword cannot be used in static methods",
            ]
        );
    }

    #[test]
    fn implicit_receiver_in_static_methods() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let calls = [
            b.expr_stmt(b.call(None, "foo", &[])),
            b.expr_stmt(b.call(None, "util", &[])),
        ];
        let statik = MethodModifiers::PUBLIC | MethodModifiers::STATIC;
        let methods = [
            b.method("main", statik, b.void_type(), &[], &[], &calls),
            b.method(
                "foo",
                MethodModifiers::PUBLIC,
                b.int_type(),
                &[],
                &[],
                &[b.ret(Some(b.int(1)))],
            ),
            b.method("util", statik, b.void_type(), &[], &[], &[]),
            b.method("bar", MethodModifiers::PUBLIC, b.void_type(), &[], &[], &calls),
        ];
        let program = with_methods(&arena, &methods);

        assert_eq!(
            messages(&run(&ThisUsage::new(Some("main".into())), program)),
            vec!["Instance method 'foo' cannot be called from static method 'main'"]
        );
    }
}
