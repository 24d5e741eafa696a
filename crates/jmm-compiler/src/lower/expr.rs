//! Expression lowering.
//!
//! Every expression lowers to a list of side-effect instructions plus a
//! result [`Operand`]. Intermediate values always land in fresh temporaries,
//! so an operand is never evaluated twice. Comparisons and logical operators
//! lower to branches; where their value is needed it is materialised as 0/1
//! through a branch diamond.

use jmm_ast::{BinaryOp, CallExpr, Expr, Ident, LiteralKind};
use jmm_core::{CompilationError, JmmType, Result};

use crate::context::MethodContext;
use crate::ir::{ArithOp, Call, CallKind, CallTarget, Condition, Instruction, Label, Operand};
use crate::symbol_table::VarLookup;

/// Side effects and the operand holding the value of a lowered expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    pub effects: Vec<Instruction>,
    pub result: Operand,
}

/// Lowers expressions for every method of a compilation unit.
///
/// Temporary and label counters are shared across the unit and never reset,
/// so names are unique within the emitted class.
#[derive(Debug, Default)]
pub struct ExprLowerer {
    temps: u32,
    labels: u32,
}

impl ExprLowerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of temporaries allocated so far.
    pub fn temp_count(&self) -> u32 {
        self.temps
    }

    /// Lower `expr` in `cx`. `expected` is the type the surrounding code
    /// wants, used for calls whose return type the table cannot tell.
    pub fn lower(
        &mut self,
        expr: &Expr<'_>,
        cx: &MethodContext<'_>,
        expected: &JmmType,
    ) -> Result<Lowered> {
        let mut effects = Vec::new();
        let result = self.value(expr, cx, expected, &mut effects)?;
        Ok(Lowered { effects, result })
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// A fresh temporary that does not shadow any variable of the method.
    pub(crate) fn temp(&mut self, cx: &MethodContext<'_>) -> String {
        loop {
            let name = format!("t{}", self.temps);
            self.temps += 1;
            if cx.lookup(&name).is_none() {
                return name;
            }
        }
    }

    /// A fresh id for a group of related labels.
    pub(crate) fn label_id(&mut self) -> u32 {
        let id = self.labels;
        self.labels += 1;
        id
    }

    fn temp_assign(
        &mut self,
        cx: &MethodContext<'_>,
        rhs: Instruction,
        ty: JmmType,
        out: &mut Vec<Instruction>,
    ) -> Operand {
        let name = self.temp(cx);
        out.push(Instruction::assign(name.clone(), rhs, ty.clone()));
        Operand::var(name, ty)
    }

    fn name(&self, ident: &Ident<'_>, cx: &MethodContext<'_>) -> Result<Operand> {
        match cx.lookup(ident.name) {
            Some(VarLookup::Field(symbol)) => Ok(Operand::Field {
                name: symbol.name.clone(),
                ty: symbol.ty.clone(),
            }),
            Some(var) => Ok(Operand::var(ident.name, var.ty().clone())),
            None => Err(CompilationError::UnresolvedSymbol {
                name: ident.name.to_string(),
                method: cx.method_name().to_string(),
                span: ident.span,
            }),
        }
    }

    // ==========================================================================
    // Values
    // ==========================================================================

    pub(crate) fn value(
        &mut self,
        expr: &Expr<'_>,
        cx: &MethodContext<'_>,
        expected: &JmmType,
        out: &mut Vec<Instruction>,
    ) -> Result<Operand> {
        match expr {
            Expr::Literal(lit) => Ok(match lit.kind {
                LiteralKind::Int(value) => Operand::int(value),
                LiteralKind::Bool(value) => Operand::boolean(value),
            }),
            Expr::Ident(ident) => self.name(ident, cx),
            Expr::This(_) => Ok(Operand::This(cx.table.class_type())),
            Expr::Binary(bin) => match ArithOp::from_binary(bin.op) {
                Some(op) => {
                    let int = JmmType::int();
                    let left = self.value(bin.left, cx, &int, out)?;
                    let right = self.value(bin.right, cx, &int, out)?;
                    let rhs = Instruction::BinaryOp {
                        op,
                        left,
                        right,
                        ty: int.clone(),
                    };
                    Ok(self.temp_assign(cx, rhs, int, out))
                }
                None => self.materialize(expr, cx, out),
            },
            Expr::Not(_) => self.materialize(expr, cx, out),
            Expr::Call(call) => self.call_value(call, cx, expected, out),
            Expr::New(new) => {
                let ty = JmmType::simple(new.class.name);
                let rhs = Instruction::New {
                    class: new.class.name.to_string(),
                };
                let object = self.temp_assign(cx, rhs, ty, out);
                out.push(Instruction::Call(Call {
                    kind: CallKind::Constructor,
                    target: CallTarget::Receiver(object.clone()),
                    method: "<init>".to_string(),
                    args: Vec::new(),
                    return_type: JmmType::void(),
                }));
                Ok(object)
            }
            Expr::NewArray(new) => {
                let length = self.value(new.length, cx, &JmmType::int(), out)?;
                Ok(self.temp_assign(
                    cx,
                    Instruction::NewArray { length },
                    JmmType::int_array(),
                    out,
                ))
            }
            Expr::Index(index) => {
                let array = self.value(index.array, cx, &JmmType::int_array(), out)?;
                let index = self.value(index.index, cx, &JmmType::int(), out)?;
                Ok(self.temp_assign(
                    cx,
                    Instruction::ArrayLoad { array, index },
                    JmmType::int(),
                    out,
                ))
            }
            Expr::Length(length) => {
                let array = self.value(length.array, cx, &JmmType::int_array(), out)?;
                Ok(self.temp_assign(
                    cx,
                    Instruction::ArrayLength { array },
                    JmmType::int(),
                    out,
                ))
            }
            Expr::ArrayLiteral(literal) => {
                let elements: Vec<&Expr<'_>> = literal.elements.iter().collect();
                self.pack(&elements, &JmmType::int(), cx, out)
            }
            Expr::Paren(paren) => self.value(paren.inner, cx, expected, out),
        }
    }

    /// Store `elements` into a fresh array of their element type.
    fn pack(
        &mut self,
        elements: &[&Expr<'_>],
        element: &JmmType,
        cx: &MethodContext<'_>,
        out: &mut Vec<Instruction>,
    ) -> Result<Operand> {
        let length = Operand::int(elements.len() as i32);
        let array = self.temp_assign(
            cx,
            Instruction::NewArray { length },
            JmmType::array_of(element.base_name.clone()),
            out,
        );
        for (position, item) in elements.iter().enumerate() {
            let value = self.value(item, cx, element, out)?;
            out.push(Instruction::ArrayStore {
                array: array.clone(),
                index: Operand::int(position as i32),
                value,
            });
        }
        Ok(array)
    }

    /// Evaluate a boolean expression into a 0/1 temporary.
    fn materialize(
        &mut self,
        expr: &Expr<'_>,
        cx: &MethodContext<'_>,
        out: &mut Vec<Instruction>,
    ) -> Result<Operand> {
        let id = self.label_id();
        let on_true = Label(format!("true_{}", id));
        let on_false = Label(format!("false_{}", id));
        let end = Label(format!("end_{}", id));
        let result = self.temp(cx);
        let boolean = JmmType::boolean();

        self.branch(expr, cx, &on_true, &on_false, out)?;
        out.push(Instruction::Label(on_false));
        out.push(Instruction::assign(
            result.clone(),
            Instruction::Value(Operand::boolean(false)),
            boolean.clone(),
        ));
        out.push(Instruction::Goto(end.clone()));
        out.push(Instruction::Label(on_true));
        out.push(Instruction::assign(
            result.clone(),
            Instruction::Value(Operand::boolean(true)),
            boolean.clone(),
        ));
        out.push(Instruction::Label(end));
        Ok(Operand::var(result, boolean))
    }

    // ==========================================================================
    // Conditions
    // ==========================================================================

    /// Jump to `on_true` when `expr` holds and to `on_false` otherwise.
    /// `&&` and `||` short-circuit.
    pub(crate) fn branch(
        &mut self,
        expr: &Expr<'_>,
        cx: &MethodContext<'_>,
        on_true: &Label,
        on_false: &Label,
        out: &mut Vec<Instruction>,
    ) -> Result<()> {
        match expr {
            Expr::Paren(paren) => self.branch(paren.inner, cx, on_true, on_false, out),
            Expr::Literal(lit) if matches!(lit.kind, LiteralKind::Bool(_)) => {
                let target = if lit.kind == LiteralKind::Bool(true) {
                    on_true
                } else {
                    on_false
                };
                out.push(Instruction::Goto(target.clone()));
                Ok(())
            }
            Expr::Not(not) => self.branch(not.operand, cx, on_false, on_true, out),
            Expr::Binary(bin) if bin.op == BinaryOp::Lt => {
                let int = JmmType::int();
                let left = self.value(bin.left, cx, &int, out)?;
                let right = self.value(bin.right, cx, &int, out)?;
                out.push(Instruction::Branch {
                    condition: Condition::Less(left, right),
                    target: on_true.clone(),
                });
                out.push(Instruction::Goto(on_false.clone()));
                Ok(())
            }
            Expr::Binary(bin) if bin.op == BinaryOp::And => {
                let middle = Label(format!("and_{}", self.label_id()));
                self.branch(bin.left, cx, &middle, on_false, out)?;
                out.push(Instruction::Label(middle));
                self.branch(bin.right, cx, on_true, on_false, out)
            }
            Expr::Binary(bin) if bin.op == BinaryOp::Or => {
                let middle = Label(format!("or_{}", self.label_id()));
                self.branch(bin.left, cx, on_true, &middle, out)?;
                out.push(Instruction::Label(middle));
                self.branch(bin.right, cx, on_true, on_false, out)
            }
            _ => {
                let value = self.value(expr, cx, &JmmType::boolean(), out)?;
                out.push(Instruction::Branch {
                    condition: Condition::NonZero(value),
                    target: on_true.clone(),
                });
                out.push(Instruction::Goto(on_false.clone()));
                Ok(())
            }
        }
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    fn call_value(
        &mut self,
        call: &CallExpr<'_>,
        cx: &MethodContext<'_>,
        expected: &JmmType,
        out: &mut Vec<Instruction>,
    ) -> Result<Operand> {
        let call = self.call(call, cx, expected, out)?;
        if call.return_type.is_void() || call.return_type.is_unknown() {
            return Err(CompilationError::UnsupportedType {
                ty: call.return_type.to_string(),
                context: format!("the value of a call to '{}'", call.method),
            });
        }
        let ty = call.return_type.clone();
        Ok(self.temp_assign(cx, Instruction::Call(call), ty, out))
    }

    /// Lower a call whose result is not used: void calls stand alone, others
    /// are wrapped in [`Instruction::Discard`].
    pub(crate) fn call_statement(
        &mut self,
        call: &CallExpr<'_>,
        cx: &MethodContext<'_>,
        out: &mut Vec<Instruction>,
    ) -> Result<()> {
        let call = self.call(call, cx, &JmmType::void(), out)?;
        if call.return_type.is_void() {
            out.push(Instruction::Call(call));
        } else {
            out.push(Instruction::Discard(Box::new(Instruction::Call(call))));
        }
        Ok(())
    }

    /// Lower receiver and arguments, left to right, and build the call.
    pub(crate) fn call(
        &mut self,
        call: &CallExpr<'_>,
        cx: &MethodContext<'_>,
        expected: &JmmType,
        out: &mut Vec<Instruction>,
    ) -> Result<Call> {
        let table = cx.table;
        let callee = cx.resolver().local_callee(call, cx.method);

        let (kind, target) = match call.receiver.map(|receiver| receiver.unparenthesized()) {
            // A static method has no receiver to call through.
            None => match table.method(call.method.name) {
                Some(signature) if !signature.is_static && cx.is_static() => {
                    return Err(CompilationError::MissingContext {
                        what: format!(
                            "receiver for instance method '{}' called from static method '{}'",
                            call.method.name,
                            cx.method_name()
                        ),
                    });
                }
                Some(signature) if signature.is_static => (
                    CallKind::Static,
                    CallTarget::Class(table.class_name().to_string()),
                ),
                None if cx.is_static() => (
                    CallKind::Static,
                    CallTarget::Class(table.class_name().to_string()),
                ),
                _ => (CallKind::Virtual, CallTarget::This),
            },
            Some(Expr::This(_)) => (CallKind::Virtual, CallTarget::This),
            Some(Expr::Ident(ident))
                if cx.lookup(ident.name).is_none() && table.is_known_class(ident.name) =>
            {
                (CallKind::Static, CallTarget::Class(ident.name.to_string()))
            }
            Some(receiver) => {
                let receiver = self.value(receiver, cx, &JmmType::unknown(), out)?;
                (CallKind::Virtual, CallTarget::Receiver(receiver))
            }
        };

        let mut args = Vec::with_capacity(call.args.len());
        match callee {
            Some(signature) => {
                let fixed = signature.fixed_arity().min(call.args.len());
                for (arg, param) in call.args[..fixed].iter().zip(&signature.params) {
                    args.push(self.value(arg, cx, &param.ty, out)?);
                }
                let trailing = &call.args[fixed..];
                match (signature.varargs, signature.params.last()) {
                    (true, Some(array)) => {
                        if let [single] = trailing
                            && cx.type_of(single) == array.ty
                        {
                            args.push(self.value(single, cx, &array.ty, out)?);
                        } else {
                            let element = array.ty.element().unwrap_or_else(JmmType::int);
                            let trailing: Vec<&Expr<'_>> = trailing.iter().collect();
                            args.push(self.pack(&trailing, &element, cx, out)?);
                        }
                    }
                    _ => {
                        for arg in trailing {
                            let hint = argument_hint(arg, cx);
                            args.push(self.value(arg, cx, &hint, out)?);
                        }
                    }
                }
            }
            None => {
                for arg in call.args {
                    let hint = argument_hint(arg, cx);
                    args.push(self.value(arg, cx, &hint, out)?);
                }
            }
        }

        let return_type = callee
            .map(|signature| signature.return_type.clone())
            .unwrap_or_else(|| expected.clone());

        Ok(Call {
            kind,
            target,
            method: call.method.name.to_string(),
            args,
            return_type,
        })
    }
}

/// Expected type for an argument with no declared parameter: its own static
/// type, or `int` when that is unknown.
fn argument_hint(arg: &Expr<'_>, cx: &MethodContext<'_>) -> JmmType {
    let ty = cx.type_of(arg);
    if ty.is_unknown() { JmmType::int() } else { ty }
}
