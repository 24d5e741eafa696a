//! Expression nodes.

use jmm_core::Span;

use crate::Ident;
use crate::ops::BinaryOp;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer or boolean literal
    Literal(LiteralExpr),
    /// Variable reference (or, as a call receiver, a class name)
    Ident(Ident<'ast>),
    /// `this`
    This(ThisExpr),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Logical negation `!e`
    Not(&'ast NotExpr<'ast>),
    /// Method call, with or without an explicit receiver
    Call(&'ast CallExpr<'ast>),
    /// `new C()`
    New(NewExpr<'ast>),
    /// `new int[n]`
    NewArray(&'ast NewArrayExpr<'ast>),
    /// `a[i]`
    Index(&'ast IndexExpr<'ast>),
    /// `a.length`
    Length(&'ast LengthExpr<'ast>),
    /// `[e1, e2, ...]`
    ArrayLiteral(ArrayLiteralExpr<'ast>),
    /// `(e)`
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::This(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Not(e) => e.span,
            Self::Call(e) => e.span,
            Self::New(e) => e.span,
            Self::NewArray(e) => e.span,
            Self::Index(e) => e.span,
            Self::Length(e) => e.span,
            Self::ArrayLiteral(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = paren.inner;
        }
        expr
    }

    /// A short, source-like rendering used in diagnostic messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(lit) => match lit.kind {
                LiteralKind::Int(value) => value.to_string(),
                LiteralKind::Bool(value) => value.to_string(),
            },
            Self::Ident(ident) => ident.name.to_string(),
            Self::This(_) => "this".to_string(),
            Self::Binary(bin) => format!(
                "{} {} {}",
                bin.left.describe(),
                bin.op,
                bin.right.describe()
            ),
            Self::Not(not) => format!("!{}", not.operand.describe()),
            Self::Call(call) => match call.receiver {
                Some(receiver) => format!("{}.{}(...)", receiver.describe(), call.method.name),
                None => format!("{}(...)", call.method.name),
            },
            Self::New(new) => format!("new {}()", new.class.name),
            Self::NewArray(new) => format!("new int[{}]", new.length.describe()),
            Self::Index(index) => format!("{}[{}]", index.array.describe(), index.index.describe()),
            Self::Length(length) => format!("{}.length", length.array.describe()),
            Self::ArrayLiteral(_) => "[...]".to_string(),
            Self::Paren(paren) => format!("({})", paren.inner.describe()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub span: Span,
}

/// The kind of literal. There are no floating-point or string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int(i32),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThisExpr {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotExpr<'ast> {
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// A method call. `receiver` is `None` for an implicit `this` (or static
/// same-class) call such as `foo(1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub receiver: Option<&'ast Expr<'ast>>,
    pub method: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    pub class: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewArrayExpr<'ast> {
    pub length: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub array: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthExpr<'ast> {
    pub array: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayLiteralExpr<'ast> {
    pub elements: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub inner: &'ast Expr<'ast>,
    pub span: Span,
}
