//! Declaration nodes: the program root, imports, the class and its members.

use bitflags::bitflags;
use jmm_core::{JmmType, Span};

use crate::stmt::Stmt;
use crate::{Ident, TypeExpr};

/// The root of a compilation unit: imports followed by exactly one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub imports: &'ast [ImportDecl<'ast>],
    pub class: &'ast ClassDecl<'ast>,
    pub span: Span,
}

/// `import a.b.C;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportDecl<'ast> {
    /// Path segments in source order.
    pub path: &'ast [Ident<'ast>],
    pub span: Span,
}

impl ImportDecl<'_> {
    /// The dot-joined path (`a.b.C`).
    pub fn qualified_name(&self) -> String {
        self.path
            .iter()
            .map(|segment| segment.name)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The last path segment, i.e. the name the class is used by (`C`).
    pub fn simple_name(&self) -> &str {
        self.path.last().map(|segment| segment.name).unwrap_or("")
    }
}

/// The single class of a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    pub name: Ident<'ast>,
    pub super_class: Option<Ident<'ast>>,
    pub fields: &'ast [VarDecl<'ast>],
    pub methods: &'ast [MethodDecl<'ast>],
    pub span: Span,
}

/// A field or local variable declaration (`int[] a;`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}

bitflags! {
    /// Method modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodModifiers: u8 {
        const PUBLIC = 1 << 0;
        const STATIC = 1 << 1;
    }
}

/// A method declaration.
///
/// Locals are declared up front, before the statements of the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    pub name: Ident<'ast>,
    pub modifiers: MethodModifiers,
    pub return_type: TypeExpr<'ast>,
    pub params: &'ast [Param<'ast>],
    pub locals: &'ast [VarDecl<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

impl MethodDecl<'_> {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodModifiers::STATIC)
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(MethodModifiers::PUBLIC)
    }
}

/// A method parameter. `int... xs` is a varargs parameter of element type `int`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub is_varargs: bool,
    pub span: Span,
}

impl Param<'_> {
    /// The parameter's type as seen by the method body. Varargs become arrays.
    pub fn declared_type(&self) -> JmmType {
        JmmType::new(self.ty.name, self.ty.is_array || self.is_varargs)
    }
}
