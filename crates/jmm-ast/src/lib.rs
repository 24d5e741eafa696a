//! Java-- abstract syntax tree.
//!
//! The tree is produced by an external parser and handed to the compiler
//! fully built. Nodes are allocated in a [`bumpalo::Bump`] arena and borrow
//! from it through the `'ast` lifetime; every node is `Copy`.
//!
//! - [`decl`]: program, imports, class, fields, methods, parameters
//! - [`stmt`]: statements
//! - [`expr`]: expressions
//! - [`ops`]: binary operators
//! - [`builder`]: [`AstBuilder`] for allocating nodes in an arena
//! - [`tagged`]: conversion from the generic tagged-node form
//! - [`visitor`]: context-carrying traversal of method bodies
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use jmm_ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.var("a"), BinaryOp::Add, b.int(3));
//! assert!(matches!(sum, jmm_ast::Expr::Binary(_)));
//! ```

pub mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;
pub mod tagged;
pub mod visitor;

use jmm_core::{JmmType, Span};

pub use builder::AstBuilder;
pub use decl::{ClassDecl, ImportDecl, MethodDecl, MethodModifiers, Param, Program, VarDecl};
pub use expr::{
    ArrayLiteralExpr, BinaryExpr, CallExpr, Expr, IndexExpr, LengthExpr, LiteralExpr, LiteralKind,
    NewArrayExpr, NewExpr, NotExpr, ParenExpr, ThisExpr,
};
pub use ops::BinaryOp;
pub use stmt::{AssignStmt, Block, ExprStmt, IfStmt, ReturnStmt, Stmt, WhileStmt};
pub use tagged::{AstError, TaggedNode};
pub use visitor::Visitor;

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

/// A written type: a base name and whether it carries `[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExpr<'ast> {
    pub name: &'ast str,
    pub is_array: bool,
    pub span: Span,
}

impl TypeExpr<'_> {
    /// The declared type this expression denotes.
    pub fn to_type(&self) -> JmmType {
        JmmType::new(self.name, self.is_array)
    }
}
