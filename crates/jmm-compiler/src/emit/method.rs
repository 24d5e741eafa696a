//! Instruction selection for one method body.

use jmm_core::{CompilationError, JmmType, Result, Span};

use super::descriptor::{class_path, descriptor, method_descriptor};
use crate::ir::{
    ArithOp, Call, CallKind, CallTarget, Condition, Instruction, IrClass, IrMethod, Operand,
};

/// Emits the Jasmin instruction lines of a single method.
pub(super) struct MethodEmitter<'c> {
    class: &'c IrClass,
    method: &'c IrMethod,
    code: String,
}

impl<'c> MethodEmitter<'c> {
    pub(super) fn new(class: &'c IrClass, method: &'c IrMethod) -> Self {
        Self {
            class,
            method,
            code: String::new(),
        }
    }

    /// Emit every instruction and return the body text.
    pub(super) fn finish(mut self) -> Result<String> {
        for instruction in &self.method.instructions {
            self.instruction(instruction)?;
        }
        Ok(self.code)
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    fn emit(&mut self, line: &str) {
        self.code.push_str("  ");
        self.code.push_str(line);
        self.code.push('\n');
    }

    fn emit_label(&mut self, name: &str) {
        self.code.push_str(name);
        self.code.push_str(":\n");
    }

    /// Push an integer constant using the shortest encoding.
    fn emit_int(&mut self, value: i32) {
        let line = match value {
            -1 => "iconst_m1".to_string(),
            0..=5 => format!("iconst_{}", value),
            -128..=127 => format!("bipush {}", value),
            -32768..=32767 => format!("sipush {}", value),
            _ => format!("ldc {}", value),
        };
        self.emit(&line);
    }

    /// `iload`/`aload` (or the `istore`/`astore` forms) of a register.
    fn emit_register(&mut self, action: &str, name: &str, ty: &JmmType) -> Result<()> {
        let register = self.method.vars.get(name).ok_or_else(|| {
            CompilationError::UnresolvedSymbol {
                name: name.to_string(),
                method: self.method.name.clone(),
                span: Span::default(),
            }
        })?;
        let prefix = type_prefix(ty);
        let line = if register.slot <= 3 {
            format!("{}{}_{}", prefix, action, register.slot)
        } else {
            format!("{}{} {}", prefix, action, register.slot)
        };
        self.emit(&line);
        Ok(())
    }

    fn load(&mut self, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Literal { value, .. } => {
                self.emit_int(*value);
                Ok(())
            }
            Operand::VarRef { name, ty } => self.emit_register("load", name, ty),
            Operand::Field { name, ty } => {
                let class = self.class;
                self.emit("aload_0");
                self.field_access("getfield", &class.name, name, ty)
            }
            Operand::This(_) => {
                self.emit("aload_0");
                Ok(())
            }
        }
    }

    fn field_access(&mut self, op: &str, owner: &str, field: &str, ty: &JmmType) -> Result<()> {
        let line = format!(
            "{} {}/{} {}",
            op,
            class_path(self.class, owner),
            field,
            descriptor(self.class, ty)?
        );
        self.emit(&line);
        Ok(())
    }

    // ==========================================================================
    // Instructions
    // ==========================================================================

    fn instruction(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction {
            Instruction::Assign { dest, rhs, ty } => {
                match rhs.as_ref() {
                    Instruction::New { class } => {
                        self.emit(&format!("new {}", class_path(self.class, class)));
                        self.emit("dup");
                    }
                    Instruction::Call(call) => self.call(call)?,
                    other => self.value(other)?,
                }
                self.emit_register("store", dest, ty)
            }
            Instruction::Call(call) => {
                if !call.return_type.is_void() {
                    return Err(CompilationError::MalformedInstruction {
                        message: format!(
                            "result of call to '{}' is neither assigned nor discarded",
                            call.method
                        ),
                    });
                }
                self.call(call)
            }
            Instruction::Discard(inner) => match inner.as_ref() {
                Instruction::Call(call) => {
                    self.call(call)?;
                    if !call.return_type.is_void() {
                        self.emit("pop");
                    }
                    Ok(())
                }
                other => Err(CompilationError::MalformedInstruction {
                    message: format!("cannot discard '{}'", other),
                }),
            },
            Instruction::FieldPut {
                receiver,
                field,
                ty,
                value,
            } => {
                self.load(receiver)?;
                self.load(value)?;
                let owner = receiver.ty().base_name.clone();
                self.field_access("putfield", &owner, field, ty)
            }
            Instruction::ArrayStore {
                array,
                index,
                value,
            } => {
                self.load(array)?;
                self.load(index)?;
                self.load(value)?;
                self.emit("iastore");
                Ok(())
            }
            Instruction::Label(label) => {
                self.emit_label(label.name());
                Ok(())
            }
            Instruction::Goto(label) => {
                self.emit(&format!("goto {}", label.name()));
                Ok(())
            }
            Instruction::Branch { condition, target } => {
                match condition {
                    Condition::Less(left, right) => {
                        self.load(left)?;
                        self.load(right)?;
                        self.emit(&format!("if_icmplt {}", target.name()));
                    }
                    Condition::NonZero(operand) => {
                        self.load(operand)?;
                        self.emit(&format!("ifne {}", target.name()));
                    }
                }
                Ok(())
            }
            Instruction::Return { value, ty } => {
                if ty.is_void() {
                    self.emit("return");
                    return Ok(());
                }
                let value = value.as_ref().ok_or_else(|| CompilationError::MalformedInstruction {
                    message: format!("method '{}' returns no value", self.method.name),
                })?;
                self.load(value)?;
                self.emit(&format!("{}return", type_prefix(ty)));
                Ok(())
            }
            other => Err(CompilationError::MalformedInstruction {
                message: format!("'{}' outside an assignment", other),
            }),
        }
    }

    /// Leave the value of a right-hand side on the stack.
    fn value(&mut self, rhs: &Instruction) -> Result<()> {
        match rhs {
            Instruction::Value(operand) => self.load(operand),
            Instruction::BinaryOp {
                op, left, right, ..
            } => {
                self.load(left)?;
                self.load(right)?;
                self.emit(match op {
                    ArithOp::Add => "iadd",
                    ArithOp::Sub => "isub",
                    ArithOp::Mul => "imul",
                    ArithOp::Div => "idiv",
                });
                Ok(())
            }
            Instruction::NewArray { length } => {
                self.load(length)?;
                self.emit("newarray int");
                Ok(())
            }
            Instruction::FieldGet {
                receiver, field, ty, ..
            } => {
                self.load(receiver)?;
                let owner = receiver.ty().base_name.clone();
                self.field_access("getfield", &owner, field, ty)
            }
            Instruction::ArrayLoad { array, index } => {
                self.load(array)?;
                self.load(index)?;
                self.emit("iaload");
                Ok(())
            }
            Instruction::ArrayLength { array } => {
                self.load(array)?;
                self.emit("arraylength");
                Ok(())
            }
            other => Err(CompilationError::MalformedInstruction {
                message: format!("'{}' does not produce a value", other),
            }),
        }
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn call(&mut self, call: &Call) -> Result<()> {
        let owner = match &call.target {
            CallTarget::This => {
                self.emit("aload_0");
                self.class.name.clone()
            }
            CallTarget::Receiver(receiver) => {
                self.load(receiver)?;
                receiver.ty().base_name.clone()
            }
            CallTarget::Class(name) => name.clone(),
        };

        if call.kind == CallKind::Constructor {
            // the allocation was already duplicated; drop the spare reference
            let line = format!("invokespecial {}/<init>()V", class_path(self.class, &owner));
            self.emit(&line);
            self.emit("pop");
            return Ok(());
        }

        for arg in &call.args {
            self.load(arg)?;
        }

        let signature = match self.class.method(&call.method) {
            Some(callee) if owner == self.class.name => {
                method_descriptor(self.class, callee.param_types(), &callee.return_type)?
            }
            _ => method_descriptor(
                self.class,
                call.args.iter().map(Operand::ty),
                &call.return_type,
            )?,
        };
        let opcode = match (call.kind, &call.target) {
            (CallKind::Static, CallTarget::Class(_)) => "invokestatic",
            (CallKind::Virtual, CallTarget::This | CallTarget::Receiver(_)) => "invokevirtual",
            _ => {
                return Err(CompilationError::MalformedInstruction {
                    message: format!("call to '{}' has a mismatched target", call.method),
                });
            }
        };
        let line = format!(
            "{} {}/{}{}",
            opcode,
            class_path(self.class, &owner),
            call.method,
            signature
        );
        self.emit(&line);
        Ok(())
    }
}

/// `i` for int-family values, `a` for references.
fn type_prefix(ty: &JmmType) -> &'static str {
    if ty.is_integer_family() { "i" } else { "a" }
}
