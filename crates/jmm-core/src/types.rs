//! The declared-type data model.

use std::fmt;

use crate::primitives;

/// A resolved type: a base name plus array-ness.
///
/// Two types are equal iff both the base name and the array flag match; there
/// is no implicit widening. The empty base name is the "unknown" sentinel the
/// resolver returns for shapes it cannot type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JmmType {
    /// Base type name (`int`, `boolean`, `void`, or a class name).
    pub base_name: String,
    /// Whether this is a one-dimensional array of `base_name`.
    pub is_array: bool,
}

impl JmmType {
    /// Create a type from a base name and array flag.
    pub fn new(base_name: impl Into<String>, is_array: bool) -> Self {
        Self {
            base_name: base_name.into(),
            is_array,
        }
    }

    /// A non-array type.
    pub fn simple(base_name: impl Into<String>) -> Self {
        Self::new(base_name, false)
    }

    /// An array of `base_name`.
    pub fn array_of(base_name: impl Into<String>) -> Self {
        Self::new(base_name, true)
    }

    pub fn int() -> Self {
        Self::simple(primitives::INT)
    }

    pub fn boolean() -> Self {
        Self::simple(primitives::BOOLEAN)
    }

    pub fn void() -> Self {
        Self::simple(primitives::VOID)
    }

    pub fn int_array() -> Self {
        Self::array_of(primitives::INT)
    }

    /// The sentinel for "could not be resolved".
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.base_name.is_empty()
    }

    /// Scalar (non-array) `int`.
    pub fn is_int(&self) -> bool {
        !self.is_array && self.base_name == primitives::INT
    }

    /// Scalar (non-array) `boolean`.
    pub fn is_boolean(&self) -> bool {
        !self.is_array && self.base_name == primitives::BOOLEAN
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.base_name == primitives::VOID
    }

    /// Values of this type live in integer registers (`int` and `boolean`).
    pub fn is_integer_family(&self) -> bool {
        !self.is_array && primitives::is_scalar(&self.base_name)
    }

    /// A known type that is neither a primitive scalar, `void`, nor an array.
    pub fn is_class(&self) -> bool {
        !self.is_array
            && !self.is_unknown()
            && !primitives::is_scalar(&self.base_name)
            && self.base_name != primitives::VOID
    }

    /// The element type of an array type, `None` for non-arrays.
    pub fn element(&self) -> Option<JmmType> {
        self.is_array.then(|| JmmType::simple(self.base_name.clone()))
    }
}

impl fmt::Display for JmmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("<unknown>");
        }
        f.write_str(&self.base_name)?;
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A named, typed declaration (field, parameter or local).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    pub ty: JmmType,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: JmmType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
