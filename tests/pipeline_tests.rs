//! End-to-end compilation: AST in, diagnostics and Jasmin out.

use bumpalo::Bump;
use jmm::{
    AstBuilder, BuildError, CompilationUnit, CompilerOptions, MethodModifiers, Program,
    TaggedNode, compile,
};
use jmm_ast::BinaryOp;
use jmm_compiler::ir::{ArithOp, Instruction, Operand};
use jmm_core::JmmType;

const STATIC: MethodModifiers = MethodModifiers::PUBLIC.union(MethodModifiers::STATIC);

fn string_array<'ast>(b: AstBuilder<'ast>) -> jmm_ast::TypeExpr<'ast> {
    b.ty("String", true)
}

/// `class Counter { int x; public int get() { return x; } }`
fn counter(b: AstBuilder<'_>) -> &Program<'_> {
    let get = b.method(
        "get",
        MethodModifiers::PUBLIC,
        b.int_type(),
        &[],
        &[],
        &[b.ret(Some(b.var("x")))],
    );
    let class = b.class("Counter", None, &[b.var_decl(b.int_type(), "x")], &[get]);
    b.program(&[], class)
}

#[test]
fn getter_compiles_to_field_get_and_return() {
    let arena = Bump::new();
    let output = compile(counter(AstBuilder::new(&arena)), CompilerOptions::default()).unwrap();

    assert!(output.diagnostics.is_empty());
    let jasmin = output.jasmin;
    assert_eq!(jasmin.matches(".field ").count(), 1);
    assert!(jasmin.contains(".field public x I\n"));
    assert_eq!(jasmin.matches(".method public <init>()V").count(), 1);
    assert!(jasmin.contains(".method public get()I\n"));
    assert!(jasmin.contains("  aload_0\n  getfield Counter/x I\n  ireturn\n.end method\n"));
}

#[test]
fn emission_is_stable() {
    let arena = Bump::new();
    let program = counter(AstBuilder::new(&arena));

    let mut unit = CompilationUnit::new(program, CompilerOptions::default());
    let first = unit.jasmin().unwrap().to_string();
    let second = unit.jasmin().unwrap().to_string();
    assert_eq!(first, second);

    let mut fresh = CompilationUnit::new(program, CompilerOptions::default());
    assert_eq!(fresh.jasmin().unwrap(), first);
}

#[test]
fn field_operand_is_loaded_at_use() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let m = b.method(
        "m",
        MethodModifiers::PUBLIC,
        b.void_type(),
        &[],
        &[b.var_decl(b.int_type(), "a")],
        &[b.assign(b.var("a"), b.binary(b.var("b"), BinaryOp::Add, b.int(3)))],
    );
    let class = b.class("A", None, &[b.var_decl(b.int_type(), "b")], &[m]);
    let program = b.program(&[], class);

    let mut unit = CompilationUnit::new(program, CompilerOptions::default());
    let ir = unit.ir().unwrap();
    let body = &ir.method("m").unwrap().instructions;

    let Instruction::Assign { dest: temp, rhs, .. } = &body[0] else {
        panic!("expected the sum first, found {:?}", body[0]);
    };
    assert!(matches!(
        rhs.as_ref(),
        Instruction::BinaryOp { op: ArithOp::Add, left: Operand::Field { name, .. }, .. } if name == "b"
    ));
    assert_eq!(
        body[1],
        Instruction::assign(
            "a",
            Instruction::Value(Operand::var(temp.clone(), JmmType::int())),
            JmmType::int(),
        )
    );

    let jasmin = unit.jasmin().unwrap();
    assert!(jasmin.contains("  aload_0\n  getfield A/b I\n  iconst_3\n  iadd\n  istore_1\n  iload_1\n  istore_2\n"));
}

/// `static int foo(int a)`, `static void main(String[] args) { foo(true); }`
/// and an unrelated `int ok()`.
fn mismatched_call(b: AstBuilder<'_>) -> &Program<'_> {
    let foo = b.method(
        "foo",
        STATIC,
        b.int_type(),
        &[b.param(b.int_type(), "a")],
        &[],
        &[b.ret(Some(b.var("a")))],
    );
    let main = b.method(
        "main",
        STATIC,
        b.void_type(),
        &[b.param(string_array(b), "args")],
        &[],
        &[b.expr_stmt(b.call(None, "foo", &[b.boolean(true)]))],
    );
    let ok = b.method(
        "ok",
        MethodModifiers::PUBLIC,
        b.int_type(),
        &[],
        &[],
        &[b.ret(Some(b.int(1)))],
    );
    b.program(&[], b.class("Calls", None, &[], &[foo, main, ok]))
}

#[test]
fn diagnostics_do_not_block_generation() {
    let arena = Bump::new();
    let output = compile(
        mismatched_call(AstBuilder::new(&arena)),
        CompilerOptions::default(),
    )
    .unwrap();

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics.iter().next().unwrap().message,
        "Argument 1 of call to 'foo' has type 'boolean' but 'int' is expected"
    );
    let jasmin = output.jasmin;
    assert!(jasmin.contains(".method public static foo(I)I\n"));
    assert!(jasmin.contains(".method public static main([Ljava/lang/String;)V\n"));
    assert!(jasmin.contains("  iconst_1\n  invokestatic Calls/foo(I)I\n  pop\n  return\n"));
    assert!(jasmin.contains(".method public ok()I\n"));
}

#[test]
fn semantic_errors_can_abort_emission() {
    let arena = Bump::new();
    let program = mismatched_call(AstBuilder::new(&arena));
    let options = CompilerOptions::default().with_abort_on_semantic_errors(true);
    let mut unit = CompilationUnit::new(program, options);

    match unit.jasmin() {
        Err(BuildError::SemanticErrors(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected semantic errors, got {:?}", other.map(str::len)),
    }
    // lowering itself is still available
    assert!(unit.ir().is_ok());
}

#[test]
fn instance_call_from_static_method_is_reported_and_not_emitted() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let foo = b.method(
        "foo",
        MethodModifiers::PUBLIC,
        b.int_type(),
        &[],
        &[],
        &[b.ret(Some(b.int(1)))],
    );
    let main = b.method(
        "main",
        STATIC,
        b.void_type(),
        &[b.param(string_array(b), "args")],
        &[],
        &[b.expr_stmt(b.call(None, "foo", &[]))],
    );
    let program = b.program(&[], b.class("A", None, &[], &[foo, main]));
    let mut unit = CompilationUnit::new(program, CompilerOptions::default());

    let messages: Vec<String> = unit
        .analyze()
        .unwrap()
        .iter()
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(
        messages,
        vec!["Instance method 'foo' cannot be called from static method 'main'"]
    );
    assert!(matches!(
        unit.jasmin(),
        Err(BuildError::Compilation(jmm::CompilationError::MissingContext { .. }))
    ));
}

#[test]
fn loops_and_arrays() {
    // import io.Printer;
    // class Sum {
    //   public static void main(String[] args) {
    //     int[] xs; int i; int total;
    //     xs = [1, 2, 3]; i = 0; total = 0;
    //     while (i < xs.length) { total = total + xs[i]; i = i + 1; }
    //     Printer.print(total);
    //   }
    // }
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let body = b.block(&[
        b.assign(
            b.var("total"),
            b.binary(b.var("total"), BinaryOp::Add, b.index(b.var("xs"), b.var("i"))),
        ),
        b.assign(b.var("i"), b.binary(b.var("i"), BinaryOp::Add, b.int(1))),
    ]);
    let main = b.method(
        "main",
        STATIC,
        b.void_type(),
        &[b.param(string_array(b), "args")],
        &[
            b.var_decl(b.int_array_type(), "xs"),
            b.var_decl(b.int_type(), "i"),
            b.var_decl(b.int_type(), "total"),
        ],
        &[
            b.assign(b.var("xs"), b.array_literal(&[b.int(1), b.int(2), b.int(3)])),
            b.assign(b.var("i"), b.int(0)),
            b.assign(b.var("total"), b.int(0)),
            b.while_loop(b.binary(b.var("i"), BinaryOp::Lt, b.length(b.var("xs"))), body),
            b.expr_stmt(b.call(Some(b.var("Printer")), "print", &[b.var("total")])),
        ],
    );
    let program = b.program(&[b.import("io.Printer")], b.class("Sum", None, &[], &[main]));

    let output = compile(program, CompilerOptions::default()).unwrap();
    assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);

    let jasmin = output.jasmin;
    for expected in [
        "  iconst_3\n  newarray int\n",
        "  iastore\n",
        "  arraylength\n",
        "  if_icmplt while_body_0\n  goto while_end_0\n",
        "while_body_0:\n",
        "  iaload\n",
        "  goto while_cond_0\n",
        "  invokestatic io/Printer/print(I)V\n  return\n.end method\n",
    ] {
        assert!(jasmin.contains(expected), "missing {:?} in\n{}", expected, jasmin);
    }
}

#[test]
fn objects_fields_and_branches() {
    // class Flip {
    //   boolean state;
    //   public boolean flip() { if (!state) { state = true; } else { state = false; } return state; }
    //   public static void main(String[] args) { Flip f; boolean r; f = new Flip(); r = f.flip(); }
    // }
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let flip = b.method(
        "flip",
        MethodModifiers::PUBLIC,
        b.boolean_type(),
        &[],
        &[],
        &[
            b.if_else(
                b.not(b.var("state")),
                b.block(&[b.assign(b.var("state"), b.boolean(true))]),
                Some(b.block(&[b.assign(b.var("state"), b.boolean(false))])),
            ),
            b.ret(Some(b.var("state"))),
        ],
    );
    let main = b.method(
        "main",
        STATIC,
        b.void_type(),
        &[b.param(string_array(b), "args")],
        &[
            b.var_decl(b.class_type("Flip"), "f"),
            b.var_decl(b.boolean_type(), "r"),
        ],
        &[
            b.assign(b.var("f"), b.new_object("Flip")),
            b.assign(b.var("r"), b.call(Some(b.var("f")), "flip", &[])),
        ],
    );
    let class = b.class(
        "Flip",
        None,
        &[b.var_decl(b.boolean_type(), "state")],
        &[flip, main],
    );
    let program = b.program(&[], class);

    let output = compile(program, CompilerOptions::default()).unwrap();
    assert!(output.diagnostics.is_empty(), "{}", output.diagnostics);

    let jasmin = output.jasmin;
    for expected in [
        "  aload_0\n  getfield Flip/state Z\n  ifne else_0\n  goto then_0\n",
        "  aload_0\n  iconst_1\n  putfield Flip/state Z\n  goto endif_0\n",
        "  aload_0\n  iconst_0\n  putfield Flip/state Z\n",
        "  new Flip\n  dup\n  astore",
        "  invokespecial Flip/<init>()V\n  pop\n",
        "  invokevirtual Flip/flip()Z\n  istore",
        "  ireturn\n",
    ] {
        assert!(jasmin.contains(expected), "missing {:?} in\n{}", expected, jasmin);
    }
}

#[test]
fn tagged_input_compiles() {
    fn ty(name: &str) -> TaggedNode {
        TaggedNode::new("Type").with_attr("name", name)
    }

    let method = TaggedNode::new("MethodDecl")
        .with_attr("name", "twice")
        .with_attr("isPublic", "true")
        .with_child(ty("int"))
        .with_child(TaggedNode::new("Param").with_attr("name", "n").with_child(ty("int")))
        .with_child(
            TaggedNode::new("ReturnStmt").with_child(
                TaggedNode::new("BinaryExpr")
                    .with_attr("op", "*")
                    .with_child(TaggedNode::new("VarRefExpr").with_attr("name", "n"))
                    .with_child(TaggedNode::new("Literal").with_attr("name", "2")),
            ),
        );
    let root = TaggedNode::new("Program")
        .with_child(TaggedNode::new("ImportDecl").with_attr("lib", "io.Printer"))
        .with_child(
            TaggedNode::new("ClassDecl")
                .with_attr("name", "Tagged")
                .with_child(method),
        );

    let arena = Bump::new();
    let mut unit = CompilationUnit::from_tagged(&arena, &root, CompilerOptions::default()).unwrap();
    assert!(unit.analyze().unwrap().is_empty());
    let jasmin = unit.jasmin().unwrap();
    assert!(jasmin.contains(".method public twice(I)I\n"));
    assert!(jasmin.contains("  iload_1\n  iconst_2\n  imul\n  istore_2\n  iload_2\n  ireturn\n"));
}

#[test]
fn malformed_tagged_input_is_an_ast_error() {
    let root = TaggedNode::new("Program").with_child(TaggedNode::new("Mystery"));
    let arena = Bump::new();
    let result = CompilationUnit::from_tagged(&arena, &root, CompilerOptions::default());

    assert!(matches!(result, Err(BuildError::Ast(_))));
}

#[test]
fn ir_prints_as_text() {
    let arena = Bump::new();
    let mut unit = CompilationUnit::new(counter(AstBuilder::new(&arena)), CompilerOptions::default());
    let text = unit.ir().unwrap().to_string();

    assert!(text.starts_with("Counter {\n.field public x.i32;\n"));
    assert!(text.contains(".method public get().i32 {\n  ret.i32 this.x.i32;\n}"));
}
