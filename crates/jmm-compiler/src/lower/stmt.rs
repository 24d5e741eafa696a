//! Statement lowering.

use jmm_ast::{AssignStmt, Expr, IfStmt, ReturnStmt, Stmt, WhileStmt};
use jmm_core::{CompilationError, JmmType, Result};

use crate::context::MethodContext;
use crate::ir::{Instruction, Label, Operand};
use crate::lower::ExprLowerer;
use crate::symbol_table::VarLookup;

/// Lowers the statements of one method body, appending to its own
/// instruction list.
pub struct StmtLowerer<'l, 'a> {
    exprs: &'l mut ExprLowerer,
    cx: MethodContext<'a>,
    out: Vec<Instruction>,
}

impl<'l, 'a> StmtLowerer<'l, 'a> {
    pub fn new(exprs: &'l mut ExprLowerer, cx: MethodContext<'a>) -> Self {
        Self {
            exprs,
            cx,
            out: Vec::new(),
        }
    }

    /// Lower a whole method body. Void methods that do not end in a return
    /// get an implicit one.
    pub fn lower_body(mut self, body: &[Stmt<'_>]) -> Result<Vec<Instruction>> {
        for stmt in body {
            self.lower(stmt)?;
        }
        let ends_in_return = self.out.last().is_some_and(Instruction::is_return);
        if self.cx.method.return_type.is_void() && !ends_in_return {
            self.out.push(Instruction::Return {
                value: None,
                ty: JmmType::void(),
            });
        }
        Ok(self.out)
    }

    /// Instructions produced so far.
    pub fn instructions(&self) -> &[Instruction] {
        &self.out
    }

    pub fn lower(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Block(block) => {
                for stmt in block.stmts {
                    self.lower(stmt)?;
                }
                Ok(())
            }
            Stmt::If(stmt) => self.lower_if(stmt),
            Stmt::While(stmt) => self.lower_while(stmt),
            Stmt::Expr(stmt) => match stmt.expr.unparenthesized() {
                Expr::Call(call) => self.exprs.call_statement(call, &self.cx, &mut self.out),
                expr => {
                    self.exprs
                        .value(expr, &self.cx, &JmmType::unknown(), &mut self.out)?;
                    Ok(())
                }
            },
            Stmt::Assign(stmt) => self.lower_assign(stmt),
            Stmt::Return(stmt) => self.lower_return(stmt),
        }
    }

    fn lower_assign(&mut self, stmt: &AssignStmt<'_>) -> Result<()> {
        let cx = self.cx;
        match stmt.target.unparenthesized() {
            Expr::Ident(ident) => match cx.lookup(ident.name) {
                Some(VarLookup::Field(field)) => {
                    let value = self.exprs.value(stmt.value, &cx, &field.ty, &mut self.out)?;
                    self.out.push(Instruction::FieldPut {
                        receiver: Operand::This(cx.table.class_type()),
                        field: field.name.clone(),
                        ty: field.ty.clone(),
                        value,
                    });
                    Ok(())
                }
                Some(var) => {
                    let ty = var.ty().clone();
                    let value = self.exprs.value(stmt.value, &cx, &ty, &mut self.out)?;
                    let rhs = match value {
                        Operand::Field { name, ty } => Instruction::FieldGet {
                            receiver: Operand::This(cx.table.class_type()),
                            field: name,
                            ty,
                        },
                        other => Instruction::Value(other),
                    };
                    self.out.push(Instruction::assign(ident.name, rhs, ty));
                    Ok(())
                }
                None => Err(CompilationError::UnresolvedSymbol {
                    name: ident.name.to_string(),
                    method: cx.method_name().to_string(),
                    span: ident.span,
                }),
            },
            Expr::Index(index) => {
                let array = self
                    .exprs
                    .value(index.array, &cx, &JmmType::int_array(), &mut self.out)?;
                let position = self
                    .exprs
                    .value(index.index, &cx, &JmmType::int(), &mut self.out)?;
                let value = self
                    .exprs
                    .value(stmt.value, &cx, &JmmType::int(), &mut self.out)?;
                self.out.push(Instruction::ArrayStore {
                    array,
                    index: position,
                    value,
                });
                Ok(())
            }
            other => Err(CompilationError::MalformedInstruction {
                message: format!("'{}' is not an assignable target", other.describe()),
            }),
        }
    }

    fn lower_return(&mut self, stmt: &ReturnStmt<'_>) -> Result<()> {
        let cx = self.cx;
        let ty = cx.method.return_type.clone();
        let value = match stmt.value {
            Some(expr) => Some(self.exprs.value(expr, &cx, &ty, &mut self.out)?),
            None => None,
        };
        self.out.push(Instruction::Return { value, ty });
        Ok(())
    }

    fn lower_if(&mut self, stmt: &IfStmt<'_>) -> Result<()> {
        let id = self.exprs.label_id();
        let then_label = Label(format!("then_{}", id));
        let else_label = Label(format!("else_{}", id));
        let end_label = Label(format!("endif_{}", id));

        self.exprs.branch(
            stmt.condition,
            &self.cx,
            &then_label,
            &else_label,
            &mut self.out,
        )?;
        self.out.push(Instruction::Label(then_label));
        self.lower(&stmt.then_branch)?;
        if !self.out.last().is_some_and(Instruction::ends_block) {
            self.out.push(Instruction::Goto(end_label.clone()));
        }
        self.out.push(Instruction::Label(else_label));
        if let Some(else_branch) = &stmt.else_branch {
            self.lower(else_branch)?;
        }
        self.out.push(Instruction::Label(end_label));
        Ok(())
    }

    fn lower_while(&mut self, stmt: &WhileStmt<'_>) -> Result<()> {
        let id = self.exprs.label_id();
        let cond_label = Label(format!("while_cond_{}", id));
        let body_label = Label(format!("while_body_{}", id));
        let end_label = Label(format!("while_end_{}", id));

        self.out.push(Instruction::Label(cond_label.clone()));
        self.exprs.branch(
            stmt.condition,
            &self.cx,
            &body_label,
            &end_label,
            &mut self.out,
        )?;
        self.out.push(Instruction::Label(body_label));
        self.lower(&stmt.body)?;
        self.out.push(Instruction::Goto(cond_label));
        self.out.push(Instruction::Label(end_label));
        Ok(())
    }
}
