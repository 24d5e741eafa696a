//! Construction of a [`SymbolTable`] from a program.

use jmm_ast::{MethodDecl, Program};
use jmm_core::{JmmType, Symbol};
use rustc_hash::FxHashMap;

use super::{MethodSignature, SymbolTable};

impl SymbolTable {
    /// Snapshot the declarations of `program`.
    #[tracing::instrument(skip_all, fields(class = program.class.name.name))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn from_program(program: &Program<'_>) -> Self {
        let class = program.class;

        let imports = program
            .imports
            .iter()
            .map(|import| import.qualified_name())
            .collect();

        let fields = class
            .fields
            .iter()
            .map(|field| Symbol::new(field.name.name, field.ty.to_type()))
            .collect();

        let methods: Vec<MethodSignature> =
            class.methods.iter().map(MethodSignature::from_decl).collect();

        let mut method_index = FxHashMap::default();
        for (index, method) in methods.iter().enumerate() {
            method_index.entry(method.name.clone()).or_insert(index);
        }

        let table = Self {
            class_name: class.name.name.to_string(),
            super_class: class.super_class.map(|name| name.name.to_string()),
            imports,
            fields,
            methods,
            method_index,
        };
        tracing::debug!(
            fields = table.fields.len(),
            methods = table.methods.len(),
            imports = table.imports.len(),
            "symbol table built"
        );
        table
    }
}

impl MethodSignature {
    pub fn from_decl(method: &MethodDecl<'_>) -> Self {
        let params = method
            .params
            .iter()
            .map(|param| Symbol::new(param.name.name, param.declared_type()))
            .collect();
        let locals = method
            .locals
            .iter()
            .map(|local| Symbol::new(local.name.name, local.ty.to_type()))
            .collect();

        Self {
            name: method.name.name.to_string(),
            return_type: method.return_type.to_type(),
            params,
            locals,
            is_static: method.is_static(),
            is_public: method.is_public(),
            varargs: method.params.last().is_some_and(|param| param.is_varargs),
            span: method.span,
        }
    }

    /// Parameter types in order.
    pub fn param_types(&self) -> impl Iterator<Item = &JmmType> {
        self.params.iter().map(|param| &param.ty)
    }
}
