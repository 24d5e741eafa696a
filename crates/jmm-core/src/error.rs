//! Fatal compilation errors.
//!
//! These are distinct from [`Diagnostic`](crate::Diagnostic)s: a diagnostic is a
//! recoverable report about the user's program, while a `CompilationError`
//! means an invariant between stages was broken (analysis let through a shape
//! lowering cannot handle, the IR holds an instruction the emitter cannot
//! translate, a symbol-table lookup failed where presence was guaranteed).
//! They abort the current compilation unit.

use thiserror::Error;

use crate::Span;

/// Result alias used across the compiler stages.
pub type Result<T> = std::result::Result<T, CompilationError>;

/// Errors that abort the current compilation unit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A type the target format has no representation for.
    #[error("unsupported type '{ty}' in {context}")]
    UnsupportedType {
        /// Display form of the offending type.
        ty: String,
        /// What was being translated when the type was met.
        context: String,
    },

    /// An IR instruction in a position or shape the consumer cannot translate.
    #[error("malformed instruction: {message}")]
    MalformedInstruction {
        /// Description of the shape that was found.
        message: String,
    },

    /// A name lookup failed where an earlier stage guaranteed presence.
    #[error("at {span}: unresolved symbol '{name}' in method '{method}'")]
    UnresolvedSymbol {
        /// The name that wasn't found.
        name: String,
        /// The method whose scope was searched.
        method: String,
        /// Where the name was referenced.
        span: Span,
    },

    /// A method referenced by name is not declared in the symbol table.
    #[error("unknown method '{name}'")]
    UnknownMethod {
        /// The method name that wasn't found.
        name: String,
    },

    /// A traversal needed context (such as the enclosing method) that was not provided.
    #[error("missing context: {what}")]
    MissingContext {
        /// The missing piece of context.
        what: String,
    },
}

impl CompilationError {
    /// Get the span where this error occurred, if it is tied to a source location.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::UnresolvedSymbol { span, .. } => Some(*span),
            CompilationError::UnsupportedType { .. }
            | CompilationError::MalformedInstruction { .. }
            | CompilationError::UnknownMethod { .. }
            | CompilationError::MissingContext { .. } => None,
        }
    }
}
