//! Arena-backed construction of AST nodes.
//!
//! [`AstBuilder`] is the single place nodes get allocated: the tagged-node
//! converter uses it, and so do tests that need a tree without a parser.
//! Every node built takes the builder's current span; use [`AstBuilder::at`]
//! to position nodes.

use bumpalo::Bump;
use jmm_core::Span;

use crate::decl::{ClassDecl, ImportDecl, MethodDecl, MethodModifiers, Param, Program, VarDecl};
use crate::expr::{
    ArrayLiteralExpr, BinaryExpr, CallExpr, Expr, IndexExpr, LengthExpr, LiteralExpr, LiteralKind,
    NewArrayExpr, NewExpr, NotExpr, ParenExpr, ThisExpr,
};
use crate::ops::BinaryOp;
use crate::stmt::{AssignStmt, Block, ExprStmt, IfStmt, ReturnStmt, Stmt, WhileStmt};
use crate::{Ident, TypeExpr};

/// Allocates AST nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    span: Span,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder positioned at 1:1.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Span::new(1, 1),
        }
    }

    /// A copy of this builder that stamps nodes with `line:col`.
    pub fn at(self, line: u32, col: u32) -> Self {
        self.with_span(Span::new(line, col))
    }

    /// A copy of this builder that stamps nodes with `span`.
    pub fn with_span(self, span: Span) -> Self {
        Self { span, ..self }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    // =========================================================================
    // Names and types
    // =========================================================================

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident {
            name: self.arena.alloc_str(name),
            span: self.span,
        }
    }

    pub fn ty(&self, name: &str, is_array: bool) -> TypeExpr<'ast> {
        TypeExpr {
            name: self.arena.alloc_str(name),
            is_array,
            span: self.span,
        }
    }

    pub fn int_type(&self) -> TypeExpr<'ast> {
        self.ty(jmm_core::primitives::INT, false)
    }

    pub fn int_array_type(&self) -> TypeExpr<'ast> {
        self.ty(jmm_core::primitives::INT, true)
    }

    pub fn boolean_type(&self) -> TypeExpr<'ast> {
        self.ty(jmm_core::primitives::BOOLEAN, false)
    }

    pub fn void_type(&self) -> TypeExpr<'ast> {
        self.ty(jmm_core::primitives::VOID, false)
    }

    pub fn class_type(&self, name: &str) -> TypeExpr<'ast> {
        self.ty(name, false)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&self, expr: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(expr)
    }

    fn exprs(&self, exprs: &[&'ast Expr<'ast>]) -> &'ast [Expr<'ast>] {
        self.arena.alloc_slice_fill_iter(exprs.iter().map(|e| **e))
    }

    pub fn int(&self, value: i32) -> &'ast Expr<'ast> {
        self.expr(Expr::Literal(LiteralExpr {
            kind: LiteralKind::Int(value),
            span: self.span,
        }))
    }

    pub fn boolean(&self, value: bool) -> &'ast Expr<'ast> {
        self.expr(Expr::Literal(LiteralExpr {
            kind: LiteralKind::Bool(value),
            span: self.span,
        }))
    }

    pub fn var(&self, name: &str) -> &'ast Expr<'ast> {
        self.expr(Expr::Ident(self.ident(name)))
    }

    pub fn this(&self) -> &'ast Expr<'ast> {
        self.expr(Expr::This(ThisExpr { span: self.span }))
    }

    pub fn binary(
        &self,
        left: &'ast Expr<'ast>,
        op: BinaryOp,
        right: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::Binary(self.arena.alloc(BinaryExpr {
            left,
            op,
            right,
            span: self.span,
        })))
    }

    pub fn not(&self, operand: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Not(self.arena.alloc(NotExpr {
            operand,
            span: self.span,
        })))
    }

    /// A call; `receiver` is `None` for an implicit-receiver call.
    pub fn call(
        &self,
        receiver: Option<&'ast Expr<'ast>>,
        method: &str,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::Call(self.arena.alloc(CallExpr {
            receiver,
            method: self.ident(method),
            args: self.exprs(args),
            span: self.span,
        })))
    }

    pub fn new_object(&self, class: &str) -> &'ast Expr<'ast> {
        self.expr(Expr::New(NewExpr {
            class: self.ident(class),
            span: self.span,
        }))
    }

    pub fn new_int_array(&self, length: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::NewArray(self.arena.alloc(NewArrayExpr {
            length,
            span: self.span,
        })))
    }

    pub fn index(&self, array: &'ast Expr<'ast>, index: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Index(self.arena.alloc(IndexExpr {
            array,
            index,
            span: self.span,
        })))
    }

    pub fn length(&self, array: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Length(self.arena.alloc(LengthExpr {
            array,
            span: self.span,
        })))
    }

    pub fn array_literal(&self, elements: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        self.expr(Expr::ArrayLiteral(ArrayLiteralExpr {
            elements: self.exprs(elements),
            span: self.span,
        }))
    }

    pub fn paren(&self, inner: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Paren(self.arena.alloc(ParenExpr {
            inner,
            span: self.span,
        })))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn assign(&self, target: &'ast Expr<'ast>, value: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target,
            value,
            span: self.span,
        })
    }

    pub fn expr_stmt(&self, expr: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr,
            span: self.span,
        })
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value,
            span: self.span,
        })
    }

    pub fn if_else(
        &self,
        condition: &'ast Expr<'ast>,
        then_branch: Stmt<'ast>,
        else_branch: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: self.span,
        }))
    }

    pub fn while_loop(&self, condition: &'ast Expr<'ast>, body: Stmt<'ast>) -> Stmt<'ast> {
        Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span: self.span,
        }))
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(Block {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: self.span,
        })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn var_decl(&self, ty: TypeExpr<'ast>, name: &str) -> VarDecl<'ast> {
        VarDecl {
            ty,
            name: self.ident(name),
            span: self.span,
        }
    }

    pub fn param(&self, ty: TypeExpr<'ast>, name: &str) -> Param<'ast> {
        Param {
            ty,
            name: self.ident(name),
            is_varargs: false,
            span: self.span,
        }
    }

    /// A `ty... name` parameter.
    pub fn varargs_param(&self, ty: TypeExpr<'ast>, name: &str) -> Param<'ast> {
        Param {
            is_varargs: true,
            ..self.param(ty, name)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn method(
        &self,
        name: &str,
        modifiers: MethodModifiers,
        return_type: TypeExpr<'ast>,
        params: &[Param<'ast>],
        locals: &[VarDecl<'ast>],
        body: &[Stmt<'ast>],
    ) -> MethodDecl<'ast> {
        MethodDecl {
            name: self.ident(name),
            modifiers,
            return_type,
            params: self.arena.alloc_slice_copy(params),
            locals: self.arena.alloc_slice_copy(locals),
            body: self.arena.alloc_slice_copy(body),
            span: self.span,
        }
    }

    pub fn class(
        &self,
        name: &str,
        super_class: Option<&str>,
        fields: &[VarDecl<'ast>],
        methods: &[MethodDecl<'ast>],
    ) -> &'ast ClassDecl<'ast> {
        self.arena.alloc(ClassDecl {
            name: self.ident(name),
            super_class: super_class.map(|name| self.ident(name)),
            fields: self.arena.alloc_slice_copy(fields),
            methods: self.arena.alloc_slice_copy(methods),
            span: self.span,
        })
    }

    /// An import of a dot-separated path (`java.util.List`).
    pub fn import(&self, qualified: &str) -> ImportDecl<'ast> {
        let segments: Vec<Ident<'ast>> = qualified
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.ident(segment))
            .collect();
        ImportDecl {
            path: self.arena.alloc_slice_copy(&segments),
            span: self.span,
        }
    }

    pub fn program(
        &self,
        imports: &[ImportDecl<'ast>],
        class: &'ast ClassDecl<'ast>,
    ) -> &'ast Program<'ast> {
        self.arena.alloc(Program {
            imports: self.arena.alloc_slice_copy(imports),
            class,
            span: self.span,
        })
    }
}
