//! The symbol table: an immutable snapshot of the declared structure of a class.
//!
//! Built once per compilation unit by [`SymbolTable::from_program`] and never
//! mutated afterwards. Duplicate declarations are kept in declaration order so
//! analysis can report them; lookups by name return the first declaration.

mod builder;

use jmm_core::{JmmType, Span, Symbol};
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// The declared shape of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub return_type: JmmType,
    /// Parameters in order. A varargs parameter is stored with its array type.
    pub params: Vec<Symbol>,
    /// Locals in declaration order.
    pub locals: Vec<Symbol>,
    pub is_static: bool,
    pub is_public: bool,
    /// The last parameter was declared with `...`.
    pub varargs: bool,
    pub span: Span,
}

impl MethodSignature {
    pub fn param(&self, name: &str) -> Option<(usize, &Symbol)> {
        self.params
            .iter()
            .enumerate()
            .find(|(_, param)| param.name == name)
    }

    pub fn local(&self, name: &str) -> Option<&Symbol> {
        self.locals.iter().find(|local| local.name == name)
    }

    /// The number of parameters that must always be supplied.
    pub fn fixed_arity(&self) -> usize {
        if self.varargs {
            self.params.len().saturating_sub(1)
        } else {
            self.params.len()
        }
    }

    /// The element type accepted by the varargs parameter.
    pub fn varargs_element(&self) -> Option<JmmType> {
        if !self.varargs {
            return None;
        }
        self.params.last().and_then(|param| param.ty.element())
    }
}

/// Result of [`SymbolTable::lookup_variable`]: which kind of declaration a
/// name resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarLookup<'t> {
    Field(&'t Symbol),
    Param { index: usize, symbol: &'t Symbol },
    Local(&'t Symbol),
}

impl<'t> VarLookup<'t> {
    pub fn symbol(&self) -> &'t Symbol {
        match *self {
            VarLookup::Field(symbol) | VarLookup::Local(symbol) => symbol,
            VarLookup::Param { symbol, .. } => symbol,
        }
    }

    pub fn ty(&self) -> &'t JmmType {
        &self.symbol().ty
    }

    pub fn is_field(&self) -> bool {
        matches!(self, VarLookup::Field(_))
    }
}

// ============================================================================
// SymbolTable
// ============================================================================

/// Declared structure of the single class of a compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    class_name: String,
    super_class: Option<String>,
    /// Qualified import names in source order.
    imports: Vec<String>,
    fields: Vec<Symbol>,
    /// Every method, duplicates included, in declaration order.
    methods: Vec<MethodSignature>,
    /// Method name -> index of its first declaration.
    method_index: FxHashMap<String, usize>,
}

impl SymbolTable {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    /// The class type declared by this unit.
    pub fn class_type(&self) -> JmmType {
        JmmType::simple(self.class_name.clone())
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn fields(&self) -> &[Symbol] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Method names in declaration order, duplicates included.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|method| method.name.as_str())
    }

    /// All method signatures in declaration order, duplicates included.
    pub fn signatures(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// The first method declared with `name`.
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.method_index.get(name).map(|&index| &self.methods[index])
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method_index.contains_key(name)
    }

    pub fn return_type(&self, method: &str) -> Option<&JmmType> {
        self.method(method).map(|signature| &signature.return_type)
    }

    pub fn parameters(&self, method: &str) -> Option<&[Symbol]> {
        self.method(method).map(|signature| signature.params.as_slice())
    }

    pub fn locals(&self, method: &str) -> Option<&[Symbol]> {
        self.method(method).map(|signature| signature.locals.as_slice())
    }

    /// Resolve a variable name inside `method`: field, then parameter, then
    /// local. Fields are not visible from static methods.
    pub fn lookup_variable<'t>(
        &'t self,
        name: &str,
        method: &'t MethodSignature,
    ) -> Option<VarLookup<'t>> {
        if !method.is_static
            && let Some(field) = self.field(name)
        {
            return Some(VarLookup::Field(field));
        }
        if let Some((index, symbol)) = method.param(name) {
            return Some(VarLookup::Param { index, symbol });
        }
        method.local(name).map(VarLookup::Local)
    }

    /// The qualified import whose last segment is `simple_name`.
    pub fn import_for(&self, simple_name: &str) -> Option<&str> {
        self.imports
            .iter()
            .map(String::as_str)
            .find(|import| import.rsplit('.').next() == Some(simple_name))
    }

    pub fn is_imported(&self, simple_name: &str) -> bool {
        self.import_for(simple_name).is_some()
    }

    /// A class name this unit can refer to: its own class or an import.
    pub fn is_known_class(&self, name: &str) -> bool {
        name == self.class_name || self.is_imported(name)
    }

    /// Whether `sub` is this unit's class and `sup` its declared superclass.
    pub fn is_subclass_of(&self, sub: &str, sup: &str) -> bool {
        sub == self.class_name && self.super_class.as_deref() == Some(sup)
    }
}
