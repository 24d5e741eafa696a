//! Declaration-level checks that need no method bodies.

use jmm_ast::{Ident, Program};
use jmm_core::{Diagnostic, Diagnostics, Result};

use super::AnalysisPass;
use crate::symbol_table::SymbolTable;

/// Reports every pair of same-scope declarations sharing a name.
///
/// Scopes are the class fields, the class methods, and the parameters and
/// locals of each method taken together. N declarations of one name give
/// N*(N-1)/2 errors, each at the later declaration of its pair. A parameter
/// or local of an instance method that reuses a field's name gets a warning,
/// since the field wins every lookup.
pub struct DuplicateDeclarations;

impl AnalysisPass for DuplicateDeclarations {
    fn name(&self) -> &'static str {
        "DuplicateDeclarations"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        _table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let class = program.class;

        let fields: Vec<Ident<'_>> = class.fields.iter().map(|field| field.name).collect();
        report_pairs(&fields, diagnostics, |name| {
            format!("Field '{}' declared more than 1 time", name)
        });

        let methods: Vec<Ident<'_>> = class.methods.iter().map(|method| method.name).collect();
        report_pairs(&methods, diagnostics, |name| {
            format!("Method '{}' declared more than 1 time", name)
        });

        for method in class.methods {
            let variables: Vec<Ident<'_>> = method
                .params
                .iter()
                .map(|param| param.name)
                .chain(method.locals.iter().map(|local| local.name))
                .collect();
            report_pairs(&variables, diagnostics, |name| {
                format!(
                    "Variable '{}' declared more than 1 time in method '{}'",
                    name, method.name.name
                )
            });

            if method.is_static() {
                continue;
            }
            for variable in &variables {
                if fields.iter().any(|field| field.name == variable.name) {
                    diagnostics.add_diagnostic(Diagnostic::warning(
                        variable.span,
                        format!(
                            "Variable '{}' in method '{}' is hidden by the field of the same name",
                            variable.name, method.name.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn report_pairs(
    names: &[Ident<'_>],
    diagnostics: &mut Diagnostics,
    message: impl Fn(&str) -> String,
) {
    for (i, first) in names.iter().enumerate() {
        for second in &names[i + 1..] {
            if first.name == second.name {
                diagnostics.add_diagnostic(Diagnostic::error(second.span, message(second.name)));
            }
        }
    }
}

/// A varargs parameter must be the last parameter of its method.
pub struct VarargsPlacement;

impl AnalysisPass for VarargsPlacement {
    fn name(&self) -> &'static str {
        "VarargsPlacement"
    }

    fn run<'ast>(
        &self,
        program: &'ast Program<'ast>,
        _table: &SymbolTable,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for method in program.class.methods {
            let Some((_, leading)) = method.params.split_last() else {
                continue;
            };
            for param in leading.iter().filter(|param| param.is_varargs) {
                diagnostics.add_diagnostic(Diagnostic::error(
                    param.span,
                    "Varargs can only be the last parameter",
                ));
            }
        }
        Ok(())
    }
}
