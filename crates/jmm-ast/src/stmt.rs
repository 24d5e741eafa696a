//! Statement nodes.

use jmm_core::Span;

use crate::expr::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `{ ... }`
    Block(Block<'ast>),
    /// `if (c) s else s`
    If(&'ast IfStmt<'ast>),
    /// `while (c) s`
    While(&'ast WhileStmt<'ast>),
    /// `expr;`
    Expr(ExprStmt<'ast>),
    /// `target = value;`
    Assign(AssignStmt<'ast>),
    /// `return expr;`
    Return(ReturnStmt<'ast>),
}

impl Stmt<'_> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Assign(s) => s.span,
            Self::Return(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_branch: Stmt<'ast>,
    pub else_branch: Option<Stmt<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: Stmt<'ast>,
    pub span: Span,
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// An assignment. The target is any expression as parsed; analysis checks
/// that it is an assignable place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub target: &'ast Expr<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}
