//! Jasmin emitter.
//!
//! The [`BytecodeEmitter`] turns an [`IrClass`] into Jasmin assembly text:
//! a class header, one `.field` line per field, a default constructor that
//! calls the superclass constructor, then one method block per method with
//! fixed `.limit` directives.
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = BytecodeEmitter::new(&class, EmitterOptions::default());
//! let text = emitter.build()?;
//! assert!(text.starts_with(".class public"));
//! ```

mod descriptor;
mod method;

pub use descriptor::{class_path, descriptor, method_descriptor};

use jmm_core::Result;

use crate::ir::{IrClass, IrMethod};
use method::MethodEmitter;

/// Knobs for the emitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterOptions {
    /// Value of every `.limit stack` directive.
    pub stack_limit: u16,
    /// Value of every `.limit locals` directive.
    pub locals_limit: u16,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            stack_limit: 99,
            locals_limit: 99,
        }
    }
}

/// Emits Jasmin text for one class.
///
/// The output is built once; later calls to [`build`](Self::build) return
/// the cached text.
pub struct BytecodeEmitter<'c> {
    class: &'c IrClass,
    options: EmitterOptions,
    output: Option<String>,
}

impl<'c> BytecodeEmitter<'c> {
    pub fn new(class: &'c IrClass, options: EmitterOptions) -> Self {
        Self {
            class,
            options,
            output: None,
        }
    }

    /// Whether [`build`](Self::build) has already run successfully.
    pub fn is_built(&self) -> bool {
        self.output.is_some()
    }

    /// The Jasmin text of the whole class.
    #[tracing::instrument(skip_all, fields(class = %self.class.name))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<&str> {
        let text = match self.output.take() {
            Some(text) => {
                tracing::trace!("reusing emitted class");
                text
            }
            None => self.render()?,
        };
        Ok(self.output.insert(text))
    }

    fn render(&self) -> Result<String> {
        let class = self.class;
        let super_path = match &class.super_class {
            Some(name) => class_path(class, name),
            None => "java/lang/Object".to_string(),
        };

        let mut out = String::new();
        out.push_str(&format!(".class public {}\n", class.name));
        out.push_str(&format!(".super {}\n\n", super_path));

        for field in &class.fields {
            out.push_str(&format!(
                ".field public {} {}\n",
                field.name,
                descriptor(class, &field.ty)?
            ));
        }
        if !class.fields.is_empty() {
            out.push('\n');
        }

        out.push_str(".method public <init>()V\n");
        out.push_str("  aload_0\n");
        out.push_str(&format!("  invokespecial {}/<init>()V\n", super_path));
        out.push_str("  return\n");
        out.push_str(".end method\n");

        for method in &class.methods {
            out.push('\n');
            out.push_str(&self.emit_method(method)?);
        }

        tracing::debug!(bytes = out.len(), "class emitted");
        Ok(out)
    }

    /// The `.method` block of one method.
    #[tracing::instrument(skip_all, fields(method = %method.name))]
    pub fn emit_method(&self, method: &IrMethod) -> Result<String> {
        let class = self.class;
        let mut header = String::from(".method ");
        if method.is_public {
            header.push_str("public ");
        }
        if method.is_static {
            header.push_str("static ");
        }
        header.push_str(&method.name);
        header.push_str(&method_descriptor(
            class,
            method.param_types(),
            &method.return_type,
        )?);

        let body = MethodEmitter::new(class, method).finish()?;

        Ok(format!(
            "{}\n  .limit stack {}\n  .limit locals {}\n{}.end method\n",
            header, self.options.stack_limit, self.options.locals_limit, body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        ArithOp, Call, CallKind, CallTarget, Condition, Instruction, Label, Operand, VarTable,
    };
    use jmm_core::{CompilationError, JmmType, Symbol};

    fn method(
        name: &str,
        is_static: bool,
        params: Vec<Symbol>,
        return_type: JmmType,
        instructions: Vec<Instruction>,
    ) -> IrMethod {
        let this_type = (!is_static).then(|| JmmType::simple("A"));
        let vars = VarTable::allocate(this_type, &params, &instructions);
        IrMethod {
            name: name.into(),
            is_public: true,
            is_static,
            params,
            return_type,
            instructions,
            vars,
        }
    }

    fn class(methods: Vec<IrMethod>) -> IrClass {
        IrClass {
            name: "A".into(),
            super_class: None,
            imports: vec!["io.Printer".into()],
            fields: vec![Symbol::new("x", JmmType::int())],
            methods,
        }
    }

    fn emit(methods: Vec<IrMethod>) -> Result<String> {
        let class = class(methods);
        let mut emitter = BytecodeEmitter::new(&class, EmitterOptions::default());
        emitter.build().map(str::to_string)
    }

    fn field_x() -> Operand {
        Operand::Field {
            name: "x".into(),
            ty: JmmType::int(),
        }
    }

    fn ret_int(operand: Operand) -> Instruction {
        Instruction::Return {
            value: Some(operand),
            ty: JmmType::int(),
        }
    }

    #[test]
    fn getter_class_layout() {
        let get = method("get", false, vec![], JmmType::int(), vec![ret_int(field_x())]);
        let text = emit(vec![get]).unwrap();

        assert_eq!(
            text,
            "\
.class public A
.super java/lang/Object

.field public x I

.method public <init>()V
  aload_0
  invokespecial java/lang/Object/<init>()V
  return
.end method

.method public get()I
  .limit stack 99
  .limit locals 99
  aload_0
  getfield A/x I
  ireturn
.end method
"
        );
    }

    #[test]
    fn build_is_cached() {
        let get = method("get", false, vec![], JmmType::int(), vec![ret_int(field_x())]);
        let class = class(vec![get]);
        let mut emitter = BytecodeEmitter::new(&class, EmitterOptions::default());
        assert!(!emitter.is_built());

        let first = emitter.build().unwrap().to_string();
        assert!(emitter.is_built());
        let second = emitter.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn integer_constants_pick_the_short_forms() {
        let values = [-1, 0, 5, 6, -128, 127, 128, -32768, 32767, 40000];
        let body = values
            .iter()
            .map(|&value| Instruction::assign("v", Instruction::Value(Operand::int(value)), JmmType::int()))
            .chain([ret_int(Operand::var("v", JmmType::int()))])
            .collect();
        let text = emit(vec![method("f", true, vec![], JmmType::int(), body)]).unwrap();
        let pushes: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| {
                line.starts_with("iconst") || line.starts_with("bipush")
                    || line.starts_with("sipush") || line.starts_with("ldc")
            })
            .collect();

        assert_eq!(
            pushes,
            [
                "iconst_m1",
                "iconst_0",
                "iconst_5",
                "bipush 6",
                "bipush -128",
                "bipush 127",
                "sipush 128",
                "sipush -32768",
                "sipush 32767",
                "ldc 40000",
            ]
        );
    }

    #[test]
    fn registers_past_three_use_the_long_form() {
        let params = (0..4)
            .map(|i| Symbol::new(format!("p{}", i), JmmType::int()))
            .collect();
        let body = vec![ret_int(Operand::var("p3", JmmType::int()))];
        let text = emit(vec![method("f", false, params, JmmType::int(), body)]).unwrap();

        // slot 0 is `this`
        assert!(text.contains("  iload 4\n  ireturn\n"));
    }

    #[test]
    fn arithmetic_and_stores() {
        let body = vec![
            Instruction::assign(
                "t0",
                Instruction::BinaryOp {
                    op: ArithOp::Sub,
                    left: Operand::var("a", JmmType::int()),
                    right: Operand::int(2),
                    ty: JmmType::int(),
                },
                JmmType::int(),
            ),
            ret_int(Operand::var("t0", JmmType::int())),
        ];
        let params = vec![Symbol::new("a", JmmType::int())];
        let text = emit(vec![method("f", true, params, JmmType::int(), body)]).unwrap();

        assert!(text.contains(".method public static f(I)I\n"));
        assert!(text.contains("  iload_0\n  iconst_2\n  isub\n  istore_1\n  iload_1\n  ireturn\n"));
    }

    #[test]
    fn object_construction_sequence() {
        let ty = JmmType::simple("A");
        let body = vec![
            Instruction::assign("t0", Instruction::New { class: "A".into() }, ty.clone()),
            Instruction::Call(Call {
                kind: CallKind::Constructor,
                target: CallTarget::Receiver(Operand::var("t0", ty.clone())),
                method: "<init>".into(),
                args: vec![],
                return_type: JmmType::void(),
            }),
            Instruction::Return {
                value: None,
                ty: JmmType::void(),
            },
        ];
        let text = emit(vec![method("f", true, vec![], JmmType::void(), body)]).unwrap();

        assert!(text.contains(
            "  new A\n  dup\n  astore_0\n  aload_0\n  invokespecial A/<init>()V\n  pop\n  return\n"
        ));
    }

    #[test]
    fn calls_select_opcode_and_descriptor() {
        let helper = method(
            "helper",
            true,
            vec![Symbol::new("n", JmmType::int())],
            JmmType::int(),
            vec![ret_int(Operand::var("n", JmmType::int()))],
        );
        let body = vec![
            Instruction::Discard(Box::new(Instruction::Call(Call {
                kind: CallKind::Static,
                target: CallTarget::Class("A".into()),
                method: "helper".into(),
                args: vec![Operand::int(1)],
                return_type: JmmType::int(),
            }))),
            Instruction::Call(Call {
                kind: CallKind::Static,
                target: CallTarget::Class("Printer".into()),
                method: "println".into(),
                args: vec![field_x()],
                return_type: JmmType::void(),
            }),
            Instruction::Return {
                value: None,
                ty: JmmType::void(),
            },
        ];
        let run = method("run", false, vec![], JmmType::void(), body);
        let text = emit(vec![helper, run]).unwrap();

        assert!(text.contains("  iconst_1\n  invokestatic A/helper(I)I\n  pop\n"));
        assert!(text.contains("  aload_0\n  getfield A/x I\n  invokestatic io/Printer/println(I)V\n"));
    }

    #[test]
    fn branches_and_labels() {
        let body = vec![
            Instruction::Label(Label("loop_0".into())),
            Instruction::Branch {
                condition: Condition::Less(Operand::var("i", JmmType::int()), Operand::int(10)),
                target: Label("loop_0".into()),
            },
            Instruction::Branch {
                condition: Condition::NonZero(Operand::var("b", JmmType::boolean())),
                target: Label("loop_0".into()),
            },
            Instruction::Goto(Label("loop_0".into())),
        ];
        let params = vec![
            Symbol::new("i", JmmType::int()),
            Symbol::new("b", JmmType::boolean()),
        ];
        let text = emit(vec![method("f", true, params, JmmType::void(), body)]).unwrap();

        assert!(text.contains(
            "loop_0:\n  iload_0\n  bipush 10\n  if_icmplt loop_0\n  iload_1\n  ifne loop_0\n  goto loop_0\n"
        ));
    }

    #[test]
    fn entry_method_descriptor() {
        let params = vec![Symbol::new("args", JmmType::array_of("String"))];
        let body = vec![Instruction::Return {
            value: None,
            ty: JmmType::void(),
        }];
        let text = emit(vec![method("main", true, params, JmmType::void(), body)]).unwrap();

        assert!(text.contains(".method public static main([Ljava/lang/String;)V\n"));
    }

    #[test]
    fn unassigned_non_void_call_is_rejected() {
        let body = vec![Instruction::Call(Call {
            kind: CallKind::Virtual,
            target: CallTarget::This,
            method: "get".into(),
            args: vec![],
            return_type: JmmType::int(),
        })];
        let err = emit(vec![method("f", false, vec![], JmmType::void(), body)]).unwrap_err();

        assert!(matches!(err, CompilationError::MalformedInstruction { .. }));
    }

    #[test]
    fn missing_register_is_reported() {
        let mut f = method("f", true, vec![], JmmType::int(), vec![]);
        f.instructions = vec![ret_int(Operand::var("ghost", JmmType::int()))];
        let err = emit(vec![f]).unwrap_err();

        assert!(matches!(err, CompilationError::UnresolvedSymbol { ref name, .. } if name == "ghost"));
    }
}
