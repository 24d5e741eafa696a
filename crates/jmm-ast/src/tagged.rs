//! The generic tagged-node form of a program and its conversion to the typed AST.
//!
//! External parsers hand over a tree of [`TaggedNode`]s: a kind name, string
//! attributes, and ordered children. [`AstBuilder::program_from_tagged`] checks the
//! shape of every node and builds the typed tree in the builder's arena.
//!
//! | kind               | attributes             | children                                 |
//! |--------------------|------------------------|------------------------------------------|
//! | `Program`          |                        | `ImportDecl`*, `ClassDecl`               |
//! | `ImportDecl`       | `lib`                  |                                          |
//! | `ClassDecl`        | `name`, `superClass`?  | `VarDecl`*, `MethodDecl`*                |
//! | `VarDecl`          | `name`                 | `Type`                                   |
//! | `Type`             | `name`, `isArray`      |                                          |
//! | `MethodDecl`       | `name`, `isPublic`, `isStatic` | `Type`, `Param`*, `VarDecl`*, stmt* |
//! | `Param`            | `name`, `isVarArg`     | `Type`                                   |
//! | `MethodCallExpr`   | `name`, `hasReceiver`  | receiver?, args*                         |
//!
//! Statements and the remaining expressions carry their operands as children
//! in source order.

use jmm_core::Span;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::builder::AstBuilder;
use crate::decl::{ClassDecl, ImportDecl, MethodDecl, MethodModifiers, Param, Program, VarDecl};
use crate::expr::Expr;
use crate::ops::BinaryOp;
use crate::stmt::Stmt;
use crate::TypeExpr;

/// Errors raised while converting a malformed tagged tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("at {line}:{col}: unknown node kind '{kind}'")]
    UnknownKind { kind: String, line: u32, col: u32 },

    #[error("at {line}:{col}: '{kind}' node is missing attribute '{attribute}'")]
    MissingAttribute {
        kind: String,
        attribute: &'static str,
        line: u32,
        col: u32,
    },

    #[error("at {line}:{col}: '{kind}' node expects {expected} children, found {found}")]
    ChildCount {
        kind: String,
        expected: &'static str,
        found: usize,
        line: u32,
        col: u32,
    },

    #[error("at {line}:{col}: '{kind}' node is not allowed inside '{parent}'")]
    UnexpectedChild {
        parent: String,
        kind: String,
        line: u32,
        col: u32,
    },

    #[error("at {line}:{col}: invalid literal '{text}'")]
    InvalidLiteral { text: String, line: u32, col: u32 },

    #[error("at {line}:{col}: unknown binary operator '{op}'")]
    InvalidOperator { op: String, line: u32, col: u32 },
}

/// A node of the tagged tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaggedNode {
    pub kind: String,
    pub attributes: FxHashMap<String, String>,
    pub children: Vec<TaggedNode>,
    pub line: u32,
    pub col: u32,
}

impl TaggedNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.line = line;
        self.col = col;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: TaggedNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TaggedNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn span(&self) -> Span {
        Span::new(self.line, self.col)
    }

    fn required(&self, attribute: &'static str) -> Result<&str, AstError> {
        self.attr(attribute).ok_or_else(|| AstError::MissingAttribute {
            kind: self.kind.clone(),
            attribute,
            line: self.line,
            col: self.col,
        })
    }

    /// A boolean attribute; absent means `false`.
    fn flag(&self, attribute: &str) -> bool {
        self.attr(attribute) == Some("true")
    }

    fn expect_children(&self, expected: &'static str, ok: bool) -> Result<(), AstError> {
        if ok {
            Ok(())
        } else {
            Err(AstError::ChildCount {
                kind: self.kind.clone(),
                expected,
                found: self.children.len(),
                line: self.line,
                col: self.col,
            })
        }
    }

    fn unexpected(&self, child: &TaggedNode) -> AstError {
        AstError::UnexpectedChild {
            parent: self.kind.clone(),
            kind: child.kind.clone(),
            line: child.line,
            col: child.col,
        }
    }
}

impl<'ast> AstBuilder<'ast> {
    /// Convert a tagged `Program` tree into the typed AST.
    pub fn program_from_tagged(&self, node: &TaggedNode) -> Result<&'ast Program<'ast>, AstError> {
        if node.kind != "Program" {
            return Err(AstError::UnexpectedChild {
                parent: "<root>".to_string(),
                kind: node.kind.clone(),
                line: node.line,
                col: node.col,
            });
        }

        let mut imports = Vec::new();
        let mut class = None;
        for child in &node.children {
            match child.kind.as_str() {
                "ImportDecl" => imports.push(self.import_from_tagged(child)?),
                "ClassDecl" if class.is_none() => class = Some(self.class_from_tagged(child)?),
                _ => return Err(node.unexpected(child)),
            }
        }
        let class = class.ok_or_else(|| AstError::ChildCount {
            kind: node.kind.clone(),
            expected: "exactly one ClassDecl among its",
            found: node.children.len(),
            line: node.line,
            col: node.col,
        })?;

        Ok(self.with_span(node.span()).program(&imports, class))
    }

    fn import_from_tagged(&self, node: &TaggedNode) -> Result<ImportDecl<'ast>, AstError> {
        // `lib` is either dot-joined or a bracketed list: `[java, util, List]`.
        let lib = node.required("lib")?;
        let path = lib
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split([',', '.'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        Ok(self.with_span(node.span()).import(&path))
    }

    fn class_from_tagged(&self, node: &TaggedNode) -> Result<&'ast ClassDecl<'ast>, AstError> {
        let name = node.required("name")?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        for child in &node.children {
            match child.kind.as_str() {
                "VarDecl" => fields.push(self.var_decl_from_tagged(child)?),
                "MethodDecl" => methods.push(self.method_from_tagged(child)?),
                _ => return Err(node.unexpected(child)),
            }
        }
        Ok(self
            .with_span(node.span())
            .class(name, node.attr("superClass"), &fields, &methods))
    }

    fn type_from_tagged(&self, node: &TaggedNode) -> Result<TypeExpr<'ast>, AstError> {
        if node.kind != "Type" {
            return Err(AstError::UnexpectedChild {
                parent: "declaration".to_string(),
                kind: node.kind.clone(),
                line: node.line,
                col: node.col,
            });
        }
        let name = node.required("name")?;
        Ok(self.with_span(node.span()).ty(name, node.flag("isArray")))
    }

    /// The single `Type` child of a declaration node.
    fn declared_type(&self, node: &TaggedNode) -> Result<TypeExpr<'ast>, AstError> {
        node.expect_children("1", node.children.len() == 1)?;
        self.type_from_tagged(&node.children[0])
    }

    fn var_decl_from_tagged(&self, node: &TaggedNode) -> Result<VarDecl<'ast>, AstError> {
        let name = node.required("name")?;
        let ty = self.declared_type(node)?;
        Ok(self.with_span(node.span()).var_decl(ty, name))
    }

    fn param_from_tagged(&self, node: &TaggedNode) -> Result<Param<'ast>, AstError> {
        let name = node.required("name")?;
        let ty = self.declared_type(node)?;
        let b = self.with_span(node.span());
        Ok(if node.flag("isVarArg") {
            b.varargs_param(ty, name)
        } else {
            b.param(ty, name)
        })
    }

    fn method_from_tagged(&self, node: &TaggedNode) -> Result<MethodDecl<'ast>, AstError> {
        let name = node.required("name")?;
        node.expect_children("at least 1", !node.children.is_empty())?;
        let return_type = self.type_from_tagged(&node.children[0])?;

        let mut modifiers = MethodModifiers::empty();
        if node.flag("isPublic") {
            modifiers |= MethodModifiers::PUBLIC;
        }
        if node.flag("isStatic") {
            modifiers |= MethodModifiers::STATIC;
        }

        let mut params = Vec::new();
        let mut locals = Vec::new();
        let mut body = Vec::new();
        for child in &node.children[1..] {
            match child.kind.as_str() {
                "Param" if locals.is_empty() && body.is_empty() => {
                    params.push(self.param_from_tagged(child)?)
                }
                "VarDecl" if body.is_empty() => locals.push(self.var_decl_from_tagged(child)?),
                "Param" | "VarDecl" | "Type" => return Err(node.unexpected(child)),
                _ => body.push(self.stmt_from_tagged(child)?),
            }
        }

        Ok(self
            .with_span(node.span())
            .method(name, modifiers, return_type, &params, &locals, &body))
    }

    fn stmt_from_tagged(&self, node: &TaggedNode) -> Result<Stmt<'ast>, AstError> {
        let b = self.with_span(node.span());
        let children = &node.children;
        let stmt = match node.kind.as_str() {
            "BlockStmt" => {
                let stmts = children
                    .iter()
                    .map(|child| self.stmt_from_tagged(child))
                    .collect::<Result<Vec<_>, _>>()?;
                b.block(&stmts)
            }
            "IfStmt" => {
                node.expect_children("2 or 3", matches!(children.len(), 2 | 3))?;
                let condition = self.expr_from_tagged(&children[0])?;
                let then_branch = self.stmt_from_tagged(&children[1])?;
                let else_branch = children
                    .get(2)
                    .map(|child| self.stmt_from_tagged(child))
                    .transpose()?;
                b.if_else(condition, then_branch, else_branch)
            }
            "WhileStmt" => {
                node.expect_children("2", children.len() == 2)?;
                let condition = self.expr_from_tagged(&children[0])?;
                let body = self.stmt_from_tagged(&children[1])?;
                b.while_loop(condition, body)
            }
            "ExprStmt" => {
                node.expect_children("1", children.len() == 1)?;
                b.expr_stmt(self.expr_from_tagged(&children[0])?)
            }
            "AssignStmt" => {
                node.expect_children("2", children.len() == 2)?;
                let target = self.expr_from_tagged(&children[0])?;
                let value = self.expr_from_tagged(&children[1])?;
                b.assign(target, value)
            }
            "ReturnStmt" => {
                node.expect_children("0 or 1", children.len() <= 1)?;
                let value = children
                    .first()
                    .map(|child| self.expr_from_tagged(child))
                    .transpose()?;
                b.ret(value)
            }
            _ => return Err(unknown(node)),
        };
        Ok(stmt)
    }

    fn expr_from_tagged(&self, node: &TaggedNode) -> Result<&'ast Expr<'ast>, AstError> {
        let b = self.with_span(node.span());
        let children = &node.children;
        let unary = |node: &TaggedNode| -> Result<&'ast Expr<'ast>, AstError> {
            node.expect_children("1", node.children.len() == 1)?;
            self.expr_from_tagged(&node.children[0])
        };
        let binary =
            |node: &TaggedNode| -> Result<(&'ast Expr<'ast>, &'ast Expr<'ast>), AstError> {
                node.expect_children("2", node.children.len() == 2)?;
                Ok((
                    self.expr_from_tagged(&node.children[0])?,
                    self.expr_from_tagged(&node.children[1])?,
                ))
            };

        let expr = match node.kind.as_str() {
            "VarRefExpr" => b.var(node.required("name")?),
            "Literal" => {
                let text = node.required("name")?;
                match text {
                    "true" => b.boolean(true),
                    "false" => b.boolean(false),
                    _ => b.int(text.parse().map_err(|_| AstError::InvalidLiteral {
                        text: text.to_string(),
                        line: node.line,
                        col: node.col,
                    })?),
                }
            }
            "ThisExpr" => b.this(),
            "BinaryExpr" => {
                let symbol = node.required("op")?;
                let op = BinaryOp::from_symbol(symbol).ok_or_else(|| AstError::InvalidOperator {
                    op: symbol.to_string(),
                    line: node.line,
                    col: node.col,
                })?;
                let (left, right) = binary(node)?;
                b.binary(left, op, right)
            }
            "NotExpr" => b.not(unary(node)?),
            "MethodCallExpr" => {
                let name = node.required("name")?;
                let has_receiver = node.flag("hasReceiver");
                if has_receiver {
                    node.expect_children("at least 1", !children.is_empty())?;
                }
                let mut exprs = children
                    .iter()
                    .map(|child| self.expr_from_tagged(child))
                    .collect::<Result<Vec<_>, _>>()?;
                let receiver = has_receiver.then(|| exprs.remove(0));
                b.call(receiver, name, &exprs)
            }
            "NewObjectExpr" => b.new_object(node.required("name")?),
            "NewArrayExpr" => b.new_int_array(unary(node)?),
            "ArrayAccessExpr" => {
                let (array, index) = binary(node)?;
                b.index(array, index)
            }
            "LengthExpr" => b.length(unary(node)?),
            "ArrayLiteralExpr" => {
                let elements = children
                    .iter()
                    .map(|child| self.expr_from_tagged(child))
                    .collect::<Result<Vec<_>, _>>()?;
                b.array_literal(&elements)
            }
            "ParenExpr" => b.paren(unary(node)?),
            _ => return Err(unknown(node)),
        };
        Ok(expr)
    }
}

fn unknown(node: &TaggedNode) -> AstError {
    AstError::UnknownKind {
        kind: node.kind.clone(),
        line: node.line,
        col: node.col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::LiteralKind;
    use bumpalo::Bump;

    fn ty(name: &str, is_array: bool) -> TaggedNode {
        TaggedNode::new("Type")
            .with_attr("name", name)
            .with_attr("isArray", if is_array { "true" } else { "false" })
    }

    fn var_decl(name: &str, type_name: &str) -> TaggedNode {
        TaggedNode::new("VarDecl")
            .with_attr("name", name)
            .with_child(ty(type_name, false))
    }

    fn var_ref(name: &str) -> TaggedNode {
        TaggedNode::new("VarRefExpr").with_attr("name", name)
    }

    fn literal(text: &str) -> TaggedNode {
        TaggedNode::new("Literal").with_attr("name", text)
    }

    fn sample_program() -> TaggedNode {
        let method = TaggedNode::new("MethodDecl")
            .with_attr("name", "foo")
            .with_attr("isPublic", "true")
            .with_attr("isStatic", "false")
            .at(3, 5)
            .with_child(ty("int", false))
            .with_child(
                TaggedNode::new("Param")
                    .with_attr("name", "xs")
                    .with_attr("isVarArg", "true")
                    .with_child(ty("int", false)),
            )
            .with_child(var_decl("a", "int"))
            .with_child(
                TaggedNode::new("AssignStmt")
                    .with_child(var_ref("a"))
                    .with_child(
                        TaggedNode::new("BinaryExpr")
                            .with_attr("op", "+")
                            .with_child(var_ref("b"))
                            .with_child(literal("3")),
                    ),
            )
            .with_child(TaggedNode::new("ReturnStmt").with_child(var_ref("a")));

        TaggedNode::new("Program")
            .with_child(TaggedNode::new("ImportDecl").with_attr("lib", "[io, Printer]"))
            .with_child(
                TaggedNode::new("ClassDecl")
                    .with_attr("name", "A")
                    .with_child(var_decl("b", "int"))
                    .with_child(method),
            )
    }

    #[test]
    fn converts_full_program() {
        let arena = Bump::new();
        let program = AstBuilder::new(&arena)
            .program_from_tagged(&sample_program())
            .unwrap();

        assert_eq!(program.imports.len(), 1);
        assert_eq!(program.imports[0].qualified_name(), "io.Printer");
        assert_eq!(program.class.name.name, "A");
        assert!(program.class.super_class.is_none());
        assert_eq!(program.class.fields.len(), 1);

        let method = &program.class.methods[0];
        assert_eq!(method.name.name, "foo");
        assert!(method.is_public());
        assert!(!method.is_static());
        assert_eq!(method.span, Span::new(3, 5));
        assert!(method.params[0].is_varargs);
        assert_eq!(method.locals.len(), 1);
        assert_eq!(method.body.len(), 2);

        match method.body[0] {
            Stmt::Assign(assign) => match assign.value {
                Expr::Binary(bin) => assert_eq!(bin.op, BinaryOp::Add),
                other => panic!("expected binary, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn literal_text_selects_kind() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let kind = |text: &str| match b.expr_from_tagged(&literal(text)).unwrap() {
            Expr::Literal(lit) => lit.kind,
            other => panic!("expected literal, got {:?}", other),
        };
        assert_eq!(kind("true"), LiteralKind::Bool(true));
        assert_eq!(kind("false"), LiteralKind::Bool(false));
        assert_eq!(kind("42"), LiteralKind::Int(42));

        let err = b.expr_from_tagged(&literal("4x")).unwrap_err();
        assert!(matches!(err, AstError::InvalidLiteral { .. }));
    }

    #[test]
    fn call_with_receiver_splits_first_child() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let node = TaggedNode::new("MethodCallExpr")
            .with_attr("name", "bar")
            .with_attr("hasReceiver", "true")
            .with_child(TaggedNode::new("ThisExpr"))
            .with_child(literal("1"));

        match b.expr_from_tagged(&node).unwrap() {
            Expr::Call(call) => {
                assert!(matches!(call.receiver, Some(Expr::This(_))));
                assert_eq!(call.args.len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = b
            .expr_from_tagged(&TaggedNode::new("LambdaExpr").at(2, 9))
            .unwrap_err();
        assert_eq!(
            err,
            AstError::UnknownKind {
                kind: "LambdaExpr".to_string(),
                line: 2,
                col: 9
            }
        );
    }

    #[test]
    fn missing_attribute_is_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = b
            .expr_from_tagged(&TaggedNode::new("VarRefExpr"))
            .unwrap_err();
        assert!(matches!(
            err,
            AstError::MissingAttribute {
                attribute: "name",
                ..
            }
        ));
    }

    #[test]
    fn wrong_arity_is_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let node = TaggedNode::new("ArrayAccessExpr").with_child(var_ref("a"));
        let err = b.expr_from_tagged(&node).unwrap_err();
        assert!(matches!(err, AstError::ChildCount { found: 1, .. }));
    }

    #[test]
    fn program_without_class_is_rejected() {
        let arena = Bump::new();
        let err = AstBuilder::new(&arena)
            .program_from_tagged(&TaggedNode::new("Program"))
            .unwrap_err();
        assert!(matches!(err, AstError::ChildCount { .. }));
    }
}
