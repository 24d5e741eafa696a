//! Java-- compiler middle and back end.
//!
//! Three stages over an already-built AST:
//!
//! - **Analysis**: a [`SymbolTable`] snapshot of the declarations, then the
//!   [`AnalysisEngine`] running every [`AnalysisPass`] to collect diagnostics
//! - **Lowering**: [`IrGenerator`] turns method bodies into three-address IR
//! - **Emission**: [`BytecodeEmitter`] turns the IR into Jasmin text
//!
//! ## Modules
//!
//! - [`symbol_table`]: declared structure of the class
//! - [`type_resolver`]: static type of an expression in a method
//! - [`context`]: the enclosing-method context passed down traversals
//! - [`passes`]: semantic checks
//! - [`ir`]: the intermediate representation and register allocation
//! - [`lower`]: AST to IR
//! - [`emit`]: IR to Jasmin

pub mod context;
pub mod emit;
pub mod ir;
pub mod lower;
pub mod passes;
pub mod symbol_table;
pub mod type_resolver;

pub use context::MethodContext;
pub use emit::{BytecodeEmitter, EmitterOptions};
pub use ir::{Instruction, IrClass, IrMethod, Operand};
pub use lower::{ExprLowerer, IrGenerator, Lowered, StmtLowerer};
pub use passes::{AnalysisEngine, AnalysisPass};
pub use symbol_table::{MethodSignature, SymbolTable, VarLookup};
pub use type_resolver::TypeResolver;

// Re-export CompilationError from core for convenience
pub use jmm_core::CompilationError;
