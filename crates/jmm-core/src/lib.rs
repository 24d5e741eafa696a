//! Core types shared by every stage of the Java-- compiler.
//!
//! - [`Span`]: source positions carried by AST nodes and diagnostics
//! - [`JmmType`] and [`Symbol`]: the declared-type data model
//! - [`CompilationError`]: fatal internal errors (broken stage invariants)
//! - [`Diagnostic`] and [`Diagnostics`]: recoverable, user-facing reports

mod diagnostics;
mod error;
pub mod primitives;
mod span;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Stage};
pub use error::{CompilationError, Result};
pub use span::Span;
pub use types::{JmmType, Symbol};
