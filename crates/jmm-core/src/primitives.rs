//! Names of the built-in types of the language.

/// 32-bit signed integer.
pub const INT: &str = "int";
/// Boolean scalar.
pub const BOOLEAN: &str = "boolean";
/// Absence of a value (method return type only).
pub const VOID: &str = "void";
/// The JVM string class, only reachable through the entry method's `String[]` parameter.
pub const STRING: &str = "String";

/// Whether `name` is one of the value types (`int`, `boolean`).
pub fn is_scalar(name: &str) -> bool {
    name == INT || name == BOOLEAN
}
