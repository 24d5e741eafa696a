//! Textual form of the IR, for logs and debugging.
//!
//! Close to OLLIR: every value carries a type suffix (`a.i32`, `t0.bool`,
//! `arr.array.i32`) and instructions end in `;`.

use std::fmt::{self, Display, Formatter};

use jmm_core::{JmmType, primitives};

use super::{Call, CallKind, CallTarget, Condition, Instruction, IrClass, IrMethod, Operand};

/// Type suffix of `ty`.
struct Suffix<'a>(&'a JmmType);

impl Display for Suffix<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = self.0;
        if ty.is_array {
            f.write_str("array.")?;
        }
        match ty.base_name.as_str() {
            primitives::INT => f.write_str("i32"),
            primitives::BOOLEAN => f.write_str("bool"),
            primitives::VOID => f.write_str("V"),
            "" => f.write_str("?"),
            other => f.write_str(other),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal { value, ty } => write!(f, "{}.{}", value, Suffix(ty)),
            Operand::VarRef { name, ty } => write!(f, "{}.{}", name, Suffix(ty)),
            Operand::Field { name, ty } => write!(f, "this.{}.{}", name, Suffix(ty)),
            Operand::This(_) => f.write_str("this"),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Less(left, right) => write!(f, "{} <.bool {}", left, right),
            Condition::NonZero(operand) => write!(f, "{}", operand),
        }
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let opcode = match self.kind {
            CallKind::Constructor => "invokespecial",
            CallKind::Virtual => "invokevirtual",
            CallKind::Static => "invokestatic",
        };
        write!(f, "{}(", opcode)?;
        match &self.target {
            CallTarget::This => f.write_str("this")?,
            CallTarget::Receiver(receiver) => write!(f, "{}", receiver)?,
            CallTarget::Class(class) => f.write_str(class)?,
        }
        write!(f, ", \"{}\"", self.method)?;
        for arg in &self.args {
            write!(f, ", {}", arg)?;
        }
        write!(f, ").{}", Suffix(&self.return_type))
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Value(operand) => write!(f, "{}", operand),
            Instruction::BinaryOp {
                op,
                left,
                right,
                ty,
            } => write!(f, "{} {}.{} {}", left, op.as_str(), Suffix(ty), right),
            Instruction::Assign { dest, rhs, ty } => {
                write!(f, "{}.{} :=.{} {}", dest, Suffix(ty), Suffix(ty), rhs)
            }
            Instruction::New { class } => write!(f, "new({}).{}", class, class),
            Instruction::NewArray { length } => write!(f, "new(array, {}).array.i32", length),
            Instruction::Call(call) => write!(f, "{}", call),
            Instruction::FieldGet {
                receiver,
                field,
                ty,
            } => write!(f, "getfield({}, {}.{}).{}", receiver, field, Suffix(ty), Suffix(ty)),
            Instruction::FieldPut {
                receiver,
                field,
                ty,
                value,
            } => write!(f, "putfield({}, {}.{}, {}).V", receiver, field, Suffix(ty), value),
            Instruction::ArrayLoad { array, index } => write!(f, "{}[{}].i32", array, index),
            Instruction::ArrayStore {
                array,
                index,
                value,
            } => write!(f, "{}[{}].i32 :=.i32 {}", array, index, value),
            Instruction::ArrayLength { array } => write!(f, "arraylength({}).i32", array),
            Instruction::Label(label) => write!(f, "{}:", label.name()),
            Instruction::Goto(label) => write!(f, "goto {}", label.name()),
            Instruction::Branch { condition, target } => {
                write!(f, "if ({}) goto {}", condition, target.name())
            }
            Instruction::Discard(inner) => write!(f, "{}", inner),
            Instruction::Return { value: None, .. } => f.write_str("ret.V"),
            Instruction::Return {
                value: Some(value),
                ty,
            } => write!(f, "ret.{} {}", Suffix(ty), value),
        }
    }
}

impl Display for IrMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(".method ")?;
        if self.is_public {
            f.write_str("public ")?;
        }
        if self.is_static {
            f.write_str("static ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}.{}", param.name, Suffix(&param.ty))?;
        }
        writeln!(f, ").{} {{", Suffix(&self.return_type))?;
        for instruction in &self.instructions {
            match instruction {
                Instruction::Label(_) => writeln!(f, "{}", instruction)?,
                _ => writeln!(f, "  {};", instruction)?,
            }
        }
        f.write_str("}")
    }
}

impl Display for IrClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for import in &self.imports {
            writeln!(f, "import {};", import)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(super_class) = &self.super_class {
            write!(f, " extends {}", super_class)?;
        }
        writeln!(f, " {{")?;
        for field in &self.fields {
            writeln!(f, ".field public {}.{};", field.name, Suffix(&field.ty))?;
        }
        writeln!(f, ".construct {}().V {{", self.name)?;
        writeln!(f, "  invokespecial(this, \"<init>\").V;")?;
        writeln!(f, "}}")?;
        for method in &self.methods {
            writeln!(f, "{}", method)?;
        }
        f.write_str("}")
    }
}
