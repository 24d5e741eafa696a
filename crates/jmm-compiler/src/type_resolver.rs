//! Static type resolution for expressions.
//!
//! [`TypeResolver`] maps an expression, the enclosing method, and the symbol
//! table to a [`JmmType`]. It is pure: the same inputs always give the same
//! type and nothing is reported. Shapes it cannot type (undeclared names,
//! calls to methods outside the class) resolve to [`JmmType::unknown`], and
//! callers skip their checks on it.
//!
//! Used by both analysis and lowering.

use jmm_ast::{CallExpr, Expr, LiteralKind};
use jmm_core::JmmType;

use crate::symbol_table::{MethodSignature, SymbolTable};

#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    table: &'a SymbolTable,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Resolve the static type of `expr` inside `method`.
    pub fn resolve(&self, expr: &Expr<'_>, method: &MethodSignature) -> JmmType {
        match expr {
            Expr::Literal(lit) => match lit.kind {
                LiteralKind::Int(_) => JmmType::int(),
                LiteralKind::Bool(_) => JmmType::boolean(),
            },
            Expr::Ident(ident) => self.resolve_name(ident.name, method),
            Expr::This(_) => self.table.class_type(),
            Expr::Binary(bin) => {
                if bin.op.is_arithmetic() {
                    JmmType::int()
                } else {
                    JmmType::boolean()
                }
            }
            Expr::Not(_) => JmmType::boolean(),
            Expr::Call(call) => self
                .local_callee(call, method)
                .map(|callee| callee.return_type.clone())
                .unwrap_or_else(JmmType::unknown),
            Expr::New(new) => JmmType::simple(new.class.name),
            Expr::NewArray(_) | Expr::ArrayLiteral(_) => JmmType::int_array(),
            Expr::Index(_) | Expr::Length(_) => JmmType::int(),
            Expr::Paren(paren) => self.resolve(paren.inner, method),
        }
    }

    /// Resolve a bare name: a variable (field, parameter, local), else a
    /// class name usable as a static call target.
    pub fn resolve_name(&self, name: &str, method: &MethodSignature) -> JmmType {
        if let Some(var) = self.table.lookup_variable(name, method) {
            var.ty().clone()
        } else if self.table.is_known_class(name) {
            JmmType::simple(name)
        } else {
            JmmType::unknown()
        }
    }

    /// The signature a call binds to, when the callee is declared in this
    /// class and the receiver is (implicitly or explicitly) of this class.
    pub fn local_callee(
        &self,
        call: &CallExpr<'_>,
        method: &MethodSignature,
    ) -> Option<&'a MethodSignature> {
        let callee = self.table.method(call.method.name)?;
        match call.receiver.map(|receiver| receiver.unparenthesized()) {
            None | Some(Expr::This(_)) => Some(callee),
            Some(receiver) => {
                let ty = self.resolve(receiver, method);
                (ty.is_class() && ty.base_name == self.table.class_name()).then_some(callee)
            }
        }
    }
}
