//! Three-address intermediate representation.
//!
//! Each method is a flat list of [`Instruction`]s over named [`Operand`]s.
//! Every intermediate value lives in a temporary, so an operand is a leaf:
//! a literal, a named variable, a field of `this`, or `this` itself. Control
//! flow is explicit through labels, gotos and two-way branches; there are no
//! boolean-producing operators left at this level.

mod display;
mod registers;

use jmm_ast::BinaryOp;
use jmm_core::{JmmType, Symbol};

pub use registers::{Register, VarTable};

// ============================================================================
// Operands
// ============================================================================

/// A leaf value an instruction reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// An `int` or `boolean` constant (booleans are 0 or 1).
    Literal { value: i32, ty: JmmType },
    /// A parameter, local or temporary.
    VarRef { name: String, ty: JmmType },
    /// A field of `this`, read at the point of use.
    Field { name: String, ty: JmmType },
    /// The receiver of an instance method, typed as the class.
    This(JmmType),
}

impl Operand {
    pub fn int(value: i32) -> Self {
        Operand::Literal {
            value,
            ty: JmmType::int(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Operand::Literal {
            value: i32::from(value),
            ty: JmmType::boolean(),
        }
    }

    pub fn var(name: impl Into<String>, ty: JmmType) -> Self {
        Operand::VarRef {
            name: name.into(),
            ty,
        }
    }

    pub fn ty(&self) -> &JmmType {
        match self {
            Operand::Literal { ty, .. } | Operand::VarRef { ty, .. } | Operand::Field { ty, .. } => {
                ty
            }
            Operand::This(ty) => ty,
        }
    }
}

/// An arithmetic operator. Comparisons and logical operators become branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// The arithmetic operator for `op`, `None` for comparisons and logic.
    pub fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Add => Some(ArithOp::Add),
            BinaryOp::Sub => Some(ArithOp::Sub),
            BinaryOp::Mul => Some(ArithOp::Mul),
            BinaryOp::Div => Some(ArithOp::Div),
            BinaryOp::Lt | BinaryOp::And | BinaryOp::Or => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

// ============================================================================
// Calls and control flow
// ============================================================================

/// How a call target is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `<init>` on a freshly allocated object.
    Constructor,
    /// Instance dispatch on a receiver.
    Virtual,
    /// A class method.
    Static,
}

/// What a call is made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// The implicit receiver of the current instance method.
    This,
    /// An explicit receiver value.
    Receiver(Operand),
    /// A class, for static calls. Holds the class name as written.
    Class(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub target: CallTarget,
    pub method: String,
    pub args: Vec<Operand>,
    pub return_type: JmmType,
}

/// A jump target, unique within a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl Label {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// The test of a conditional branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Taken when `left < right`.
    Less(Operand, Operand),
    /// Taken when the operand is not zero.
    NonZero(Operand),
}

// ============================================================================
// Instructions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// A single operand used as a value (literal or variable reference).
    Value(Operand),
    BinaryOp {
        op: ArithOp,
        left: Operand,
        right: Operand,
        ty: JmmType,
    },
    /// `dest := rhs`, where `rhs` is a value-producing instruction.
    Assign {
        dest: String,
        rhs: Box<Instruction>,
        ty: JmmType,
    },
    /// Allocation only; the constructor runs as a separate call.
    New { class: String },
    /// `new int[length]`.
    NewArray { length: Operand },
    Call(Call),
    FieldGet {
        receiver: Operand,
        field: String,
        ty: JmmType,
    },
    FieldPut {
        receiver: Operand,
        field: String,
        ty: JmmType,
        value: Operand,
    },
    ArrayLoad { array: Operand, index: Operand },
    ArrayStore {
        array: Operand,
        index: Operand,
        value: Operand,
    },
    ArrayLength { array: Operand },
    Label(Label),
    Goto(Label),
    Branch { condition: Condition, target: Label },
    /// Evaluate a call for its effects and drop its result.
    Discard(Box<Instruction>),
    Return { value: Option<Operand>, ty: JmmType },
}

impl Instruction {
    pub fn assign(dest: impl Into<String>, rhs: Instruction, ty: JmmType) -> Self {
        Instruction::Assign {
            dest: dest.into(),
            rhs: Box::new(rhs),
            ty,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Instruction::Return { .. })
    }

    /// Control never falls through to the next instruction.
    pub fn ends_block(&self) -> bool {
        matches!(self, Instruction::Return { .. } | Instruction::Goto(_))
    }
}

// ============================================================================
// Methods and classes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IrMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub params: Vec<Symbol>,
    pub return_type: JmmType,
    pub instructions: Vec<Instruction>,
    /// Register assignment for every named variable of the method.
    pub vars: VarTable,
}

impl IrMethod {
    pub fn param_types(&self) -> impl Iterator<Item = &JmmType> {
        self.params.iter().map(|param| &param.ty)
    }
}

/// The lowered form of a compilation unit's class.
#[derive(Debug, Clone, PartialEq)]
pub struct IrClass {
    pub name: String,
    pub super_class: Option<String>,
    /// Qualified, dot-separated import names.
    pub imports: Vec<String>,
    pub fields: Vec<Symbol>,
    pub methods: Vec<IrMethod>,
}

impl IrClass {
    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The qualified import for a simple class name.
    pub fn import_for(&self, simple_name: &str) -> Option<&str> {
        self.imports
            .iter()
            .map(String::as_str)
            .find(|import| import.rsplit('.').next() == Some(simple_name))
    }
}
