//! Type compatibility of stores: assignments and returns.

use jmm_ast::visitor::{Visitor, walk_assign};
use jmm_ast::{AssignStmt, Expr, Program, ReturnStmt};
use jmm_core::{Diagnostic, Diagnostics, JmmType, Result};

use super::{AnalysisPass, check_bodies, is_assignable};
use crate::context::MethodContext;
use crate::symbol_table::SymbolTable;

/// The target of an assignment must be a variable or an array element, and
/// the value must fit the target's declared type.
pub struct AssignmentCompatibility;

impl AnalysisPass for AssignmentCompatibility {
    fn name(&self) -> &'static str {
        "AssignmentCompatibility"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            AssignChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct AssignChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl AssignChecker<'_, '_> {
    fn error(&mut self, expr: &Expr<'_>, message: String) {
        self.diagnostics
            .add_diagnostic(Diagnostic::error(expr.span(), message));
    }

    fn check_value(&mut self, target: &Expr<'_>, target_type: &JmmType, value: &Expr<'_>) {
        if target_type.is_unknown() {
            return;
        }

        // `a = [1, 2]` is checked element by element.
        if let (Expr::ArrayLiteral(literal), Some(element)) =
            (value.unparenthesized(), target_type.element())
        {
            for item in literal.elements {
                let found = self.cx.type_of(item);
                if !found.is_unknown() && found != element {
                    self.error(
                        item,
                        format!(
                            "Array element '{}' has type '{}' but '{}' is expected",
                            item.describe(),
                            found,
                            element
                        ),
                    );
                }
            }
            return;
        }

        let found = self.cx.type_of(value);
        if found.is_unknown() || is_assignable(self.cx.table, target_type, &found) {
            return;
        }
        self.error(
            value,
            format!(
                "Cannot assign '{}' of type '{}' to '{}' of type '{}'",
                value.describe(),
                found,
                target.describe(),
                target_type
            ),
        );
    }
}

impl<'ast> Visitor<'ast> for AssignChecker<'_, '_> {
    fn visit_assign(&mut self, stmt: &'ast AssignStmt<'ast>) {
        let target = stmt.target.unparenthesized();
        match target {
            Expr::Ident(ident) => match self.cx.lookup(ident.name) {
                Some(var) => self.check_value(target, var.ty(), stmt.value),
                None if self.cx.table.is_known_class(ident.name) => {
                    self.error(target, format!("'{}' is not a variable", ident.name));
                }
                // Undeclared names are reported by UndeclaredVariable.
                None => {}
            },
            Expr::Index(_) => self.check_value(target, &JmmType::int(), stmt.value),
            other => self.error(other, format!("'{}' is not a variable", other.describe())),
        }
        walk_assign(self, stmt);
    }
}

/// A `return` value must match the method's declared return type; a void
/// method returns nothing and a non-void method must return a value.
pub struct ReturnCompatibility;

impl AnalysisPass for ReturnCompatibility {
    fn name(&self) -> &'static str {
        "ReturnCompatibility"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            ReturnChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct ReturnChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl<'ast> Visitor<'ast> for ReturnChecker<'_, '_> {
    fn visit_return(&mut self, stmt: &'ast ReturnStmt<'ast>) {
        let declared = &self.cx.method.return_type;
        let compatible = match stmt.value {
            Some(_) if declared.is_void() => {
                self.diagnostics.add_diagnostic(Diagnostic::error(
                    stmt.span,
                    format!(
                        "Method '{}' is void and cannot return a value",
                        self.cx.method_name()
                    ),
                ));
                return;
            }
            Some(value) => {
                let found = self.cx.type_of(value);
                found.is_unknown() || is_assignable(self.cx.table, declared, &found)
            }
            None => declared.is_void(),
        };
        if !compatible {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                stmt.span,
                "Return types are not compatible",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, run, single_method};
    use bumpalo::Bump;
    use jmm_ast::{AstBuilder, MethodModifiers, Stmt};

    fn locals<'ast>(b: &AstBuilder<'ast>) -> Vec<jmm_ast::VarDecl<'ast>> {
        vec![
            b.var_decl(b.int_type(), "i"),
            b.var_decl(b.boolean_type(), "flag"),
            b.var_decl(b.int_array_type(), "arr"),
            b.var_decl(b.class_type("A"), "obj"),
            b.var_decl(b.class_type("Printer"), "printer"),
        ]
    }

    fn check<'ast>(arena: &'ast Bump, body: &[Stmt<'ast>]) -> Vec<String> {
        let b = AstBuilder::new(arena);
        let program = single_method(arena, &locals(&b), body);
        messages(&run(&AssignmentCompatibility, program))
    }

    #[test]
    fn same_type_never_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.assign(b.var("i"), b.binary(b.var("x"), jmm_ast::BinaryOp::Add, b.int(1))),
            b.assign(b.var("flag"), b.boolean(true)),
            b.assign(b.var("arr"), b.new_int_array(b.int(3))),
            b.assign(b.var("obj"), b.new_object("A")),
            b.assign(b.index(b.var("arr"), b.int(0)), b.var("p")),
            b.assign(b.var("arr"), b.array_literal(&[b.int(1), b.var("i")])),
        ];
        assert!(check(&arena, &body).is_empty());
    }

    #[test]
    fn int_from_boolean_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.assign(b.var("i"), b.var("flag"))];
        assert_eq!(
            check(&arena, &body),
            vec!["Cannot assign 'flag' of type 'boolean' to 'i' of type 'int'"]
        );
    }

    #[test]
    fn targets_must_be_places() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.assign(b.int(1), b.int(2)),
            b.assign(b.var("Printer"), b.var("printer")),
            b.assign(b.index(b.var("arr"), b.int(0)), b.boolean(false)),
        ];
        assert_eq!(
            check(&arena, &body),
            vec![
                "'1' is not a variable",
                "'Printer' is not a variable",
                "Cannot assign 'false' of type 'boolean' to 'arr[0]' of type 'int'",
            ]
        );
    }

    #[test]
    fn array_literal_elements_are_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.assign(b.var("arr"), b.array_literal(&[b.int(1), b.boolean(true)]))];
        assert_eq!(
            check(&arena, &body),
            vec!["Array element 'true' has type 'boolean' but 'int' is expected"]
        );
    }

    #[test]
    fn subclass_and_imports_are_accepted() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let method = b.method(
            "m",
            MethodModifiers::PUBLIC,
            b.void_type(),
            &[],
            &[
                b.var_decl(b.class_type("Base"), "base"),
                b.var_decl(b.class_type("Sub"), "sub"),
                b.var_decl(b.class_type("X"), "x"),
                b.var_decl(b.class_type("Y"), "y"),
            ],
            &[
                b.assign(b.var("base"), b.var("sub")),
                b.assign(b.var("x"), b.var("y")),
                b.assign(b.var("sub"), b.var("base")),
            ],
        );
        let class = b.class("Sub", Some("Base"), &[], &[method]);
        let program = b.program(&[b.import("a.X"), b.import("a.Y")], class);

        assert_eq!(
            messages(&run(&AssignmentCompatibility, program)),
            vec!["Cannot assign 'base' of type 'Base' to 'sub' of type 'Sub'"]
        );
    }

    #[test]
    fn return_types() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let void_method = b.method(
            "v",
            MethodModifiers::PUBLIC,
            b.void_type(),
            &[],
            &[],
            &[b.ret(Some(b.int(1))), b.ret(None)],
        );
        let int_method = b.method(
            "i",
            MethodModifiers::PUBLIC,
            b.int_type(),
            &[],
            &[],
            &[b.ret(Some(b.boolean(true))), b.ret(None), b.ret(Some(b.int(0)))],
        );
        let program = crate::passes::test_support::with_methods(&arena, &[void_method, int_method]);

        assert_eq!(
            messages(&run(&ReturnCompatibility, program)),
            vec![
                "Method 'v' is void and cannot return a value",
                "Return types are not compatible",
                "Return types are not compatible",
            ]
        );
    }
}
