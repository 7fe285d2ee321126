//! Variable assignments.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::php::ast::{
    ArrayExpr, AssignExpr, CallExpr, Expr, ForeachStmt, GlobalStmt, Literal, LiteralKind,
    MemberExpr, NameRef, NewExpr, ScopedExpr, VarRef,
};
use crate::php::{AstNode, SyntaxKind, SyntaxNode};

/// Coarse type of an assigned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Null,
    Array,
    /// Function, method or static method call.
    Call,
    /// `new Foo`
    New,
    /// Copy of another variable.
    Variable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableAssignment {
    /// Variable name, including `$`.
    pub name: SmolStr,
    pub value: ValueKind,
    /// Callee, instantiated class or source variable.
    pub detail: Option<SmolStr>,
    pub name_range: TextRange,
}

/// Every `$name = value`, `$name ??= value`, foreach binding and `global`
/// declaration, in source order.
pub fn variable_assignments(root: &SyntaxNode) -> Vec<VariableAssignment> {
    let mut out = Vec::new();
    for node in root.descendants() {
        if let Some(assign) = AssignExpr::cast(node.clone()) {
            if !matches!(
                assign.operator(),
                Some(SyntaxKind::EQ | SyntaxKind::QUESTION_QUESTION_EQ)
            ) {
                continue;
            }
            let (value, detail) = assign
                .value()
                .map(classify_value)
                .unwrap_or((ValueKind::Other, None));
            if let Some(target) = assign.target() {
                bind(target, value, detail, &mut out);
            }
        } else if let Some(foreach) = ForeachStmt::cast(node.clone()) {
            for binding in foreach.bindings() {
                bind(binding, ValueKind::Other, None, &mut out);
            }
        } else if let Some(global) = GlobalStmt::cast(node) {
            for var in global.variables().filter_map(|v| Expr::cast(v.syntax().clone())) {
                bind(var, ValueKind::Other, None, &mut out);
            }
        }
    }
    out
}

/// Record the variables an assignment target binds.
fn bind(
    target: Expr,
    value: ValueKind,
    detail: Option<SmolStr>,
    out: &mut Vec<VariableAssignment>,
) {
    let target = target.unparenthesized();
    if let Some(var) = VarRef::cast(target.syntax().clone()) {
        if let Some(token) = var.variable() {
            out.push(VariableAssignment {
                name: SmolStr::new(token.text()),
                value,
                detail,
                name_range: token.text_range(),
            });
        }
    } else if let Some(array) = ArrayExpr::cast(target.syntax().clone()) {
        // `[$a, $b] = ...` and `foreach ($rows as [$a, $b])`
        for element in array.elements() {
            if let Some(inner) = element.value() {
                bind(inner, ValueKind::Other, None, out);
            }
        }
    } else if target.kind() == SyntaxKind::CALL_EXPR {
        // `list($a, $b) = ...`
        let Some(call) = CallExpr::cast(target.syntax().clone()) else {
            return;
        };
        let is_list = call
            .callee()
            .and_then(|callee| NameRef::cast(callee.syntax().clone()))
            .and_then(|name| name.name())
            .is_some_and(|name| name.text().eq_ignore_ascii_case("list"));
        if let Some(args) = call.arg_list().filter(|_| is_list) {
            for inner in args.args().filter_map(|arg| arg.expr()) {
                bind(inner, ValueKind::Other, None, out);
            }
        }
    }
}

fn classify_value(expr: Expr) -> (ValueKind, Option<SmolStr>) {
    let expr = expr.unparenthesized();
    let node = expr.syntax().clone();
    match expr.kind() {
        SyntaxKind::LITERAL => {
            let kind = Literal::cast(node).and_then(|lit| lit.kind());
            let value = match kind {
                Some(LiteralKind::String) => ValueKind::String,
                Some(LiteralKind::Int) => ValueKind::Int,
                Some(LiteralKind::Float) => ValueKind::Float,
                Some(LiteralKind::Bool) => ValueKind::Bool,
                Some(LiteralKind::Null) => ValueKind::Null,
                None => ValueKind::Other,
            };
            (value, None)
        }
        SyntaxKind::ARRAY_EXPR => (ValueKind::Array, None),
        SyntaxKind::CALL_EXPR => {
            let detail = CallExpr::cast(node)
                .and_then(|call| call.callee())
                .and_then(callee_name);
            (ValueKind::Call, detail)
        }
        SyntaxKind::NEW_EXPR => {
            let detail = NewExpr::cast(node)
                .and_then(|new| new.class_name())
                .and_then(|name| name.name())
                .map(|token| SmolStr::new(token.text()));
            (ValueKind::New, detail)
        }
        SyntaxKind::VAR_REF => {
            let detail = VarRef::cast(node)
                .and_then(|var| var.variable())
                .map(|token| SmolStr::new(token.text()));
            (ValueKind::Variable, detail)
        }
        SyntaxKind::CAST_EXPR => (cast_kind(&node), None),
        SyntaxKind::BINARY_EXPR if has_direct_token(&node, SyntaxKind::DOT) => {
            (ValueKind::String, None)
        }
        // `&$other`
        SyntaxKind::UNARY_EXPR if has_direct_token(&node, SyntaxKind::AMP) => node
            .children()
            .find_map(Expr::cast)
            .map(classify_value)
            .unwrap_or((ValueKind::Other, None)),
        _ => (ValueKind::Other, None),
    }
}

/// `route`, `Str::upper`, or `->get` style name of a callee.
pub(crate) fn callee_name(callee: Expr) -> Option<SmolStr> {
    let node = callee.syntax().clone();
    match callee.kind() {
        SyntaxKind::NAME_REF => NameRef::cast(node)?.name().map(|t| SmolStr::new(t.text())),
        SyntaxKind::MEMBER_EXPR => MemberExpr::cast(node)?.name().map(|t| SmolStr::new(t.text())),
        SyntaxKind::SCOPED_EXPR => {
            let scoped = ScopedExpr::cast(node)?;
            let class = scoped
                .receiver()
                .and_then(|r| NameRef::cast(r.syntax().clone()))
                .and_then(|n| n.name())?;
            let member = scoped.member()?;
            Some(SmolStr::new(format!("{}::{}", class.text(), member.text())))
        }
        _ => None,
    }
}

fn has_direct_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

fn cast_kind(node: &SyntaxNode) -> ValueKind {
    let Some(cast) = node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::CAST)
    else {
        return ValueKind::Other;
    };
    let target: String = cast
        .text()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    match target.as_str() {
        "int" | "integer" => ValueKind::Int,
        "bool" | "boolean" => ValueKind::Bool,
        "float" | "double" | "real" => ValueKind::Float,
        "string" | "binary" => ValueKind::String,
        "array" => ValueKind::Array,
        "unset" => ValueKind::Null,
        _ => ValueKind::Other,
    }
}
