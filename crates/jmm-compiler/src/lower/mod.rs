//! AST to IR lowering.
//!
//! [`IrGenerator`] walks every method of a program. Expressions go through a
//! single [`ExprLowerer`] per unit, so temporaries and labels are unique across
//! the whole class; statements go through a fresh [`StmtLowerer`] per method.

mod expr;
mod stmt;

pub use expr::{ExprLowerer, Lowered};
pub use stmt::StmtLowerer;

use jmm_ast::{MethodDecl, Program};
use jmm_core::Result;

use crate::context::{MethodContext, method_contexts};
use crate::ir::{IrClass, IrMethod, VarTable};
use crate::symbol_table::SymbolTable;

/// Lowers a program into an [`IrClass`].
pub struct IrGenerator<'a> {
    table: &'a SymbolTable,
    exprs: ExprLowerer,
}

impl<'a> IrGenerator<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            exprs: ExprLowerer::new(),
        }
    }

    /// Lower every method of `program`, in declaration order.
    #[tracing::instrument(skip_all, fields(class = self.table.class_name()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate<'ast>(&mut self, program: &'ast Program<'ast>) -> Result<IrClass> {
        let table = self.table;
        let methods = method_contexts(program, table)?
            .into_iter()
            .map(|(decl, cx)| self.lower_method(decl, cx))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            methods = methods.len(),
            temps = self.exprs.temp_count(),
            "class lowered"
        );

        Ok(IrClass {
            name: table.class_name().to_string(),
            super_class: table.super_class().map(str::to_string),
            imports: table.imports().to_vec(),
            fields: table.fields().to_vec(),
            methods,
        })
    }

    fn lower_method(&mut self, decl: &MethodDecl<'_>, cx: MethodContext<'a>) -> Result<IrMethod> {
        let signature = cx.method;
        let instructions = StmtLowerer::new(&mut self.exprs, cx).lower_body(decl.body)?;
        let this_type = (!signature.is_static).then(|| self.table.class_type());
        let vars = VarTable::allocate(this_type, &signature.params, &instructions);

        tracing::debug!(
            method = %signature.name,
            instructions = instructions.len(),
            registers = vars.len(),
            "method lowered"
        );

        Ok(IrMethod {
            name: signature.name.clone(),
            is_public: signature.is_public,
            is_static: signature.is_static,
            params: signature.params.clone(),
            return_type: signature.return_type.clone(),
            instructions,
            vars,
        })
    }
}
