//! Virtual register assignment.
//!
//! Slots are handed out in first-use order: `this` (instance methods only),
//! then the parameters in declaration order, then every other variable in
//! the order the instruction list first mentions it.

use jmm_core::{JmmType, Symbol};
use rustc_hash::FxHashMap;

use super::{Call, CallTarget, Condition, Instruction, Operand};

/// The local-variable slot of a named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub slot: u16,
    pub ty: JmmType,
}

/// Name -> register map of one method, in slot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarTable {
    entries: Vec<(String, Register)>,
    index: FxHashMap<String, usize>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign registers for a method body.
    pub fn allocate(
        this_type: Option<JmmType>,
        params: &[Symbol],
        instructions: &[Instruction],
    ) -> Self {
        let mut table = Self::new();
        if let Some(ty) = this_type {
            table.declare("this", ty);
        }
        for param in params {
            table.declare(&param.name, param.ty.clone());
        }
        for instruction in instructions {
            table.visit(instruction);
        }
        table
    }

    /// Give `name` the next slot unless it already has one.
    pub fn declare(&mut self, name: &str, ty: JmmType) -> u16 {
        if let Some(&index) = self.index.get(name) {
            return self.entries[index].1.slot;
        }
        let slot = self.entries.len() as u16;
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), Register { slot, ty }));
        slot
    }

    pub fn get(&self, name: &str) -> Option<&Register> {
        self.index.get(name).map(|&index| &self.entries[index].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Register)> {
        self.entries
            .iter()
            .map(|(name, register)| (name.as_str(), register))
    }

    fn visit(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Value(operand) => self.operand(operand),
            Instruction::BinaryOp { left, right, .. } => {
                self.operand(left);
                self.operand(right);
            }
            Instruction::Assign { dest, rhs, ty } => {
                self.declare(dest, ty.clone());
                self.visit(rhs);
            }
            Instruction::New { .. }
            | Instruction::Label(_)
            | Instruction::Goto(_) => {}
            Instruction::NewArray { length } => self.operand(length),
            Instruction::Call(call) => self.call(call),
            Instruction::FieldGet { receiver, .. } => self.operand(receiver),
            Instruction::FieldPut {
                receiver, value, ..
            } => {
                self.operand(receiver);
                self.operand(value);
            }
            Instruction::ArrayLoad { array, index } => {
                self.operand(array);
                self.operand(index);
            }
            Instruction::ArrayStore {
                array,
                index,
                value,
            } => {
                self.operand(array);
                self.operand(index);
                self.operand(value);
            }
            Instruction::ArrayLength { array } => self.operand(array),
            Instruction::Branch { condition, .. } => match condition {
                Condition::Less(left, right) => {
                    self.operand(left);
                    self.operand(right);
                }
                Condition::NonZero(operand) => self.operand(operand),
            },
            Instruction::Discard(inner) => self.visit(inner),
            Instruction::Return { value, .. } => {
                if let Some(value) = value {
                    self.operand(value);
                }
            }
        }
    }

    fn call(&mut self, call: &Call) {
        if let CallTarget::Receiver(receiver) = &call.target {
            self.operand(receiver);
        }
        for arg in &call.args {
            self.operand(arg);
        }
    }

    fn operand(&mut self, operand: &Operand) {
        if let Operand::VarRef { name, ty } = operand {
            self.declare(name, ty.clone());
        }
    }
}
