//! JVM type descriptors and internal class names.

use jmm_core::{CompilationError, JmmType, Result, primitives};

use crate::ir::IrClass;

/// Internal (slash-separated) name of a class referenced from `class`.
///
/// The class itself stays as declared, imports resolve to their qualified
/// path, and a bare `String` means `java/lang/String`.
pub fn class_path(class: &IrClass, name: &str) -> String {
    if name == class.name {
        return name.to_string();
    }
    match class.import_for(name) {
        Some(import) => import.replace('.', "/"),
        None if name == primitives::STRING => "java/lang/String".to_string(),
        None => name.to_string(),
    }
}

/// Field or parameter descriptor of `ty`: `I`, `Z`, `V`, `[I`, `LA;`.
pub fn descriptor(class: &IrClass, ty: &JmmType) -> Result<String> {
    let base = match ty.base_name.as_str() {
        primitives::INT => "I".to_string(),
        primitives::BOOLEAN => "Z".to_string(),
        primitives::VOID if !ty.is_array => "V".to_string(),
        "" | primitives::VOID => {
            return Err(CompilationError::UnsupportedType {
                ty: ty.to_string(),
                context: "a type descriptor".to_string(),
            });
        }
        name => format!("L{};", class_path(class, name)),
    };
    Ok(if ty.is_array { format!("[{}", base) } else { base })
}

/// Method descriptor `(params)ret`.
pub fn method_descriptor<'t>(
    class: &IrClass,
    params: impl IntoIterator<Item = &'t JmmType>,
    return_type: &JmmType,
) -> Result<String> {
    let mut out = String::from("(");
    for param in params {
        out.push_str(&descriptor(class, param)?);
    }
    out.push(')');
    out.push_str(&descriptor(class, return_type)?);
    Ok(out)
}
