//! Operand checks: binary and unary operators, conditions, array access.

use jmm_ast::visitor::{Visitor, walk_expr};
use jmm_ast::{BinaryExpr, Expr, IndexExpr, NotExpr, Program};
use jmm_core::{Diagnostic, Diagnostics, JmmType, Result};

use super::{AnalysisPass, check_bodies};
use crate::context::MethodContext;
use crate::symbol_table::SymbolTable;

/// Arithmetic operators and `<` take two `int`s, `&&` and `||` take two
/// `boolean`s, and `!` takes a `boolean`.
pub struct BinaryOperandCompatibility;

impl AnalysisPass for BinaryOperandCompatibility {
    fn name(&self) -> &'static str {
        "BinaryOperandCompatibility"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            OperandChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct OperandChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl<'ast> Visitor<'ast> for OperandChecker<'_, '_> {
    fn visit_binary(&mut self, expr: &'ast BinaryExpr<'ast>) {
        let left = self.cx.type_of(expr.left);
        let right = self.cx.type_of(expr.right);
        let expected = if expr.op.is_logical() {
            JmmType::boolean()
        } else {
            JmmType::int()
        };

        if !left.is_unknown() && !right.is_unknown() && (left != expected || right != expected) {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                expr.span,
                format!(
                    "Operator '{}' expects '{}' operands but found '{}' and '{}'",
                    expr.op, expected, left, right
                ),
            ));
        }

        self.visit_expr(expr.left);
        self.visit_expr(expr.right);
    }

    fn visit_not(&mut self, expr: &'ast NotExpr<'ast>) {
        let operand = self.cx.type_of(expr.operand);
        if !operand.is_unknown() && !operand.is_boolean() {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                expr.span,
                format!("Operator '!' expects a 'boolean' operand but found '{}'", operand),
            ));
        }
        self.visit_expr(expr.operand);
    }
}

/// The condition of an `if` or `while` must be a `boolean`.
pub struct ConditionExpression;

impl AnalysisPass for ConditionExpression {
    fn name(&self) -> &'static str {
        "ConditionExpression"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            ConditionChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct ConditionChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl<'ast> Visitor<'ast> for ConditionChecker<'_, '_> {
    fn visit_condition(&mut self, condition: &'ast Expr<'ast>) {
        let ty = self.cx.type_of(condition);
        if !ty.is_unknown() && !ty.is_boolean() {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                condition.span(),
                format!("'{}' is not a condition.", condition.describe()),
            ));
        }
        self.visit_expr(condition);
    }
}

/// `a[i]` and `a.length` need an array `a`; the index must be an `int`.
pub struct ArrayIndexType;

impl AnalysisPass for ArrayIndexType {
    fn name(&self) -> &'static str {
        "ArrayIndexType"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        check_bodies(program, table, diagnostics, |decl, cx, diagnostics| {
            IndexChecker { cx, diagnostics }.visit_method(decl);
        })
    }
}

struct IndexChecker<'a, 'd> {
    cx: MethodContext<'a>,
    diagnostics: &'d mut Diagnostics,
}

impl IndexChecker<'_, '_> {
    fn check_array(&mut self, array: &Expr<'_>) {
        let ty = self.cx.type_of(array);
        if !ty.is_unknown() && !ty.is_array {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                array.span(),
                format!("'{}' is not an array", array.describe()),
            ));
        }
    }
}

impl<'ast> Visitor<'ast> for IndexChecker<'_, '_> {
    fn visit_expr(&mut self, expr: &'ast Expr<'ast>) {
        if let Expr::Length(length) = expr {
            self.check_array(length.array);
        }
        walk_expr(self, expr);
    }

    fn visit_index(&mut self, expr: &'ast IndexExpr<'ast>) {
        self.check_array(expr.array);

        let index = self.cx.type_of(expr.index);
        if !index.is_unknown() && !index.is_int() {
            self.diagnostics.add_diagnostic(Diagnostic::error(
                expr.index.span(),
                format!("'{}' is not a valid array access", expr.index.describe()),
            ));
        }

        self.visit_expr(expr.array);
        self.visit_expr(expr.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, run, single_method};
    use bumpalo::Bump;
    use jmm_ast::{AstBuilder, BinaryOp, Stmt, VarDecl};

    fn locals<'ast>(b: &AstBuilder<'ast>) -> Vec<VarDecl<'ast>> {
        vec![
            b.var_decl(b.boolean_type(), "flag"),
            b.var_decl(b.int_array_type(), "arr"),
        ]
    }

    fn check<'ast>(
        pass: &impl AnalysisPass,
        arena: &'ast Bump,
        body: &[Stmt<'ast>],
    ) -> Vec<String> {
        let b = AstBuilder::new(arena);
        messages(&run(pass, single_method(arena, &locals(&b), body)))
    }

    #[test]
    fn operator_operands() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.expr_stmt(b.binary(b.var("x"), BinaryOp::Mul, b.var("p"))),
            b.expr_stmt(b.binary(b.var("flag"), BinaryOp::And, b.boolean(true))),
            b.expr_stmt(b.binary(b.var("x"), BinaryOp::Lt, b.int(3))),
            b.expr_stmt(b.binary(b.var("flag"), BinaryOp::Add, b.int(1))),
            b.expr_stmt(b.binary(b.var("x"), BinaryOp::Or, b.var("flag"))),
            b.expr_stmt(b.binary(b.var("arr"), BinaryOp::Sub, b.int(1))),
            b.expr_stmt(b.not(b.var("x"))),
            b.expr_stmt(b.binary(b.var("ghost"), BinaryOp::Add, b.boolean(true))),
        ];
        assert_eq!(
            check(&BinaryOperandCompatibility, &arena, &body),
            vec![
                "Operator '+' expects 'int' operands but found 'boolean' and 'int'",
                "Operator '||' expects 'boolean' operands but found 'int' and 'boolean'",
                "Operator '-' expects 'int' operands but found 'int[]' and 'int'",
                "Operator '!' expects a 'boolean' operand but found 'int'",
            ]
        );
    }

    #[test]
    fn nested_operands_are_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.binary(b.var("flag"), BinaryOp::Mul, b.int(2));
        let body = [b.expr_stmt(b.binary(inner, BinaryOp::Add, b.int(1)))];
        assert_eq!(
            check(&BinaryOperandCompatibility, &arena, &body),
            vec!["Operator '*' expects 'int' operands but found 'boolean' and 'int'"]
        );
    }

    #[test]
    fn conditions_must_be_boolean() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.if_else(b.boolean(true), b.block(&[]), None),
            b.while_loop(b.binary(b.var("p"), BinaryOp::Lt, b.int(1)), b.block(&[])),
            b.if_else(b.var("flag"), b.block(&[]), None),
            b.if_else(b.call(None, "m", &[b.int(1)]), b.block(&[]), None),
            b.while_loop(b.binary(b.var("p"), BinaryOp::Add, b.int(1)), b.block(&[])),
            b.if_else(b.call(Some(b.var("Printer")), "ready", &[]), b.block(&[]), None),
        ];
        assert_eq!(
            check(&ConditionExpression, &arena, &body),
            vec!["'m(...)' is not a condition.", "'p + 1' is not a condition."]
        );
    }

    #[test]
    fn array_access_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.expr_stmt(b.index(b.var("arr"), b.binary(b.var("p"), BinaryOp::Add, b.int(1)))),
            b.expr_stmt(b.index(b.var("arr"), b.var("flag"))),
            b.expr_stmt(b.index(b.var("p"), b.int(0))),
            b.expr_stmt(b.length(b.var("x"))),
            b.expr_stmt(b.length(b.var("arr"))),
        ];
        assert_eq!(
            check(&ArrayIndexType, &arena, &body),
            vec![
                "'flag' is not a valid array access",
                "'p' is not an array",
                "'x' is not an array",
            ]
        );
    }
}
