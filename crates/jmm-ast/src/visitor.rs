//! Visitor pattern for traversing method bodies.
//!
//! Each `visit_*` method has a default that calls the matching `walk_*`
//! function, so an implementation overrides only the nodes it cares about
//! and calls `walk_*` itself when it still wants the children visited.
//!
//! ```
//! use bumpalo::Bump;
//! use jmm_ast::visitor::{walk_expr, Visitor};
//! use jmm_ast::{AstBuilder, BinaryOp, Expr};
//!
//! #[derive(Default)]
//! struct IdentCounter(usize);
//!
//! impl<'ast> Visitor<'ast> for IdentCounter {
//!     fn visit_expr(&mut self, expr: &'ast Expr<'ast>) {
//!         if matches!(expr, Expr::Ident(_)) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let expr = b.binary(b.var("a"), BinaryOp::Mul, b.var("b"));
//! let mut counter = IdentCounter::default();
//! counter.visit_expr(expr);
//! assert_eq!(counter.0, 2);
//! ```

use crate::decl::MethodDecl;
use crate::expr::*;
use crate::stmt::*;
use crate::Ident;

pub trait Visitor<'ast>: Sized {
    // === Statements ===

    fn visit_method(&mut self, method: &'ast MethodDecl<'ast>) {
        walk_method(self, method);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt<'ast>) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &'ast Block<'ast>) {
        walk_block(self, block);
    }

    fn visit_if(&mut self, stmt: &'ast IfStmt<'ast>) {
        walk_if(self, stmt);
    }

    fn visit_while(&mut self, stmt: &'ast WhileStmt<'ast>) {
        walk_while(self, stmt);
    }

    fn visit_expr_stmt(&mut self, stmt: &'ast ExprStmt<'ast>) {
        self.visit_expr(stmt.expr);
    }

    fn visit_assign(&mut self, stmt: &'ast AssignStmt<'ast>) {
        walk_assign(self, stmt);
    }

    fn visit_return(&mut self, stmt: &'ast ReturnStmt<'ast>) {
        if let Some(value) = stmt.value {
            self.visit_expr(value);
        }
    }

    /// Visit the condition of an `if` or `while`.
    fn visit_condition(&mut self, condition: &'ast Expr<'ast>) {
        self.visit_expr(condition);
    }

    // === Expressions ===

    fn visit_expr(&mut self, expr: &'ast Expr<'ast>) {
        walk_expr(self, expr);
    }

    fn visit_ident(&mut self, _ident: &'ast Ident<'ast>) {}

    fn visit_this(&mut self, _this: &'ast ThisExpr) {}

    fn visit_binary(&mut self, expr: &'ast BinaryExpr<'ast>) {
        self.visit_expr(expr.left);
        self.visit_expr(expr.right);
    }

    fn visit_not(&mut self, expr: &'ast NotExpr<'ast>) {
        self.visit_expr(expr.operand);
    }

    fn visit_call(&mut self, expr: &'ast CallExpr<'ast>) {
        walk_call(self, expr);
    }

    fn visit_index(&mut self, expr: &'ast IndexExpr<'ast>) {
        self.visit_expr(expr.array);
        self.visit_expr(expr.index);
    }
}

pub fn walk_method<'ast, V: Visitor<'ast>>(visitor: &mut V, method: &'ast MethodDecl<'ast>) {
    walk_body(visitor, method.body);
}

/// Visit a sequence of statements in order.
pub fn walk_body<'ast, V: Visitor<'ast>>(visitor: &mut V, stmts: &'ast [Stmt<'ast>]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast Stmt<'ast>) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::If(stmt) => visitor.visit_if(stmt),
        Stmt::While(stmt) => visitor.visit_while(stmt),
        Stmt::Expr(stmt) => visitor.visit_expr_stmt(stmt),
        Stmt::Assign(stmt) => visitor.visit_assign(stmt),
        Stmt::Return(stmt) => visitor.visit_return(stmt),
    }
}

pub fn walk_block<'ast, V: Visitor<'ast>>(visitor: &mut V, block: &'ast Block<'ast>) {
    walk_body(visitor, block.stmts);
}

pub fn walk_if<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast IfStmt<'ast>) {
    visitor.visit_condition(stmt.condition);
    visitor.visit_stmt(&stmt.then_branch);
    if let Some(else_branch) = &stmt.else_branch {
        visitor.visit_stmt(else_branch);
    }
}

pub fn walk_while<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast WhileStmt<'ast>) {
    visitor.visit_condition(stmt.condition);
    visitor.visit_stmt(&stmt.body);
}

pub fn walk_assign<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast AssignStmt<'ast>) {
    visitor.visit_expr(stmt.target);
    visitor.visit_expr(stmt.value);
}

pub fn walk_call<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast CallExpr<'ast>) {
    if let Some(receiver) = expr.receiver {
        visitor.visit_expr(receiver);
    }
    for arg in expr.args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast Expr<'ast>) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Ident(ident) => visitor.visit_ident(ident),
        Expr::This(this) => visitor.visit_this(this),
        Expr::Binary(bin) => visitor.visit_binary(bin),
        Expr::Not(not) => visitor.visit_not(not),
        Expr::Call(call) => visitor.visit_call(call),
        Expr::New(_) => {}
        Expr::NewArray(new) => visitor.visit_expr(new.length),
        Expr::Index(index) => visitor.visit_index(index),
        Expr::Length(length) => visitor.visit_expr(length.array),
        Expr::ArrayLiteral(array) => {
            for element in array.elements {
                visitor.visit_expr(element);
            }
        }
        Expr::Paren(paren) => visitor.visit_expr(paren.inner),
    }
}
