//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a `SyntaxNode` of one kind and exposes its children.
//! Accessors return `Option` because the tree of an incomplete fragment may
//! lack any child.

use rowan::TextRange;

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn range(&self) -> TextRange {
        self.syntax().text_range()
    }
}

// ============================================================================
// Helper utilities
// ============================================================================

/// First direct child token of one of `kinds`.
fn find_token(node: &SyntaxNode, kinds: &[SyntaxKind]) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| kinds.contains(&t.kind()))
}

/// First non-trivia token directly after the first token of kind `after`.
fn token_after(node: &SyntaxNode, after: &[SyntaxKind]) -> Option<SyntaxToken> {
    let operator = find_token(node, after)?;
    std::iter::successors(operator.next_sibling_or_token(), |e| e.next_sibling_or_token())
        .find(|e| !e.kind().is_trivia())
        .and_then(|e| e.into_token())
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Macro to generate a method that finds the first child of a specific AST type.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

// ============================================================================
// Expressions
// ============================================================================

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(pub(crate) SyntaxNode);

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_expr()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self(node))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl Expr {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(self) -> Expr {
        let mut expr = self;
        while expr.kind() == SyntaxKind::PAREN_EXPR {
            match expr.0.children().find_map(Expr::cast) {
                Some(inner) => expr = inner,
                None => break,
            }
        }
        expr
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    /// The assigned place (`$a`, `$a['k']`, `[$a, $b]`).
    pub fn target(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_assignment_op())
    }
}

ast_node!(VarRef, VAR_REF);

impl VarRef {
    /// The `$name` token, absent for `$$name` and `${expr}`.
    pub fn variable(&self) -> Option<SyntaxToken> {
        find_token(&self.0, &[SyntaxKind::VARIABLE])
            .filter(|_| find_token(&self.0, &[SyntaxKind::DOLLAR]).is_none())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        find_token(&self.0, &[SyntaxKind::NAME, SyntaxKind::STATIC_KW])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Int,
    Float,
    Bool,
    Null,
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        Some(match self.token()?.kind() {
            SyntaxKind::STRING => LiteralKind::String,
            SyntaxKind::INT_NUMBER => LiteralKind::Int,
            SyntaxKind::FLOAT_NUMBER => LiteralKind::Float,
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => LiteralKind::Bool,
            SyntaxKind::NULL_KW => LiteralKind::Null,
            _ => return None,
        })
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The called expression: a name, a member access or a static access.
    pub fn callee(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    first_child_method!(arg_list, ArgList);
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    children_method!(args, Arg);

    /// Range between the parentheses; runs to the end of the list when `)` is missing.
    pub fn inner_range(&self) -> Option<TextRange> {
        let open = find_token(&self.0, &[SyntaxKind::L_PAREN])?;
        let end = find_token(&self.0, &[SyntaxKind::R_PAREN])
            .map(|t| t.text_range().start())
            .unwrap_or_else(|| self.0.text_range().end());
        Some(TextRange::new(open.text_range().end(), end))
    }

    /// Top-level `,` tokens, in order.
    pub fn commas(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::COMMA)
    }
}

ast_node!(Arg, ARG);

impl Arg {
    first_child_method!(expr, Expr);
}

ast_node!(MemberExpr, MEMBER_EXPR);

impl MemberExpr {
    pub fn receiver(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// `->` or `?->`
    pub fn operator(&self) -> Option<SyntaxToken> {
        find_token(&self.0, &[SyntaxKind::ARROW, SyntaxKind::NULLSAFE_ARROW])
    }

    /// The member name, absent after a bare operator (`$user->`).
    pub fn name(&self) -> Option<SyntaxToken> {
        token_after(&self.0, &[SyntaxKind::ARROW, SyntaxKind::NULLSAFE_ARROW])
            .filter(|t| t.kind().is_name_like())
    }
}

ast_node!(ScopedExpr, SCOPED_EXPR);

impl ScopedExpr {
    /// Class side of `Foo::bar`.
    pub fn receiver(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        find_token(&self.0, &[SyntaxKind::COLON_COLON])
    }

    /// `bar`, `BAR`, `$bar` or `class`; absent after a bare `::`.
    pub fn member(&self) -> Option<SyntaxToken> {
        token_after(&self.0, &[SyntaxKind::COLON_COLON])
            .filter(|t| t.kind().is_name_like() || t.kind() == SyntaxKind::VARIABLE)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    first_child_method!(class_name, NameRef);
    first_child_method!(arg_list, ArgList);
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    children_method!(elements, ArrayElement);
}

ast_node!(ArrayElement, ARRAY_ELEMENT);

impl ArrayElement {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).last()
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(ForeachStmt, FOREACH_STMT);

impl ForeachStmt {
    pub fn iterable(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// Key and value bindings after `as`.
    pub fn bindings(&self) -> Vec<Expr> {
        let mut seen_as = false;
        let mut bindings = Vec::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::AS_KW => seen_as = true,
                rowan::NodeOrToken::Node(n) if seen_as => {
                    if let Some(expr) = Expr::cast(n) {
                        bindings.push(expr);
                    }
                }
                _ => {}
            }
        }
        bindings
    }
}

ast_node!(GlobalStmt, GLOBAL_STMT);

impl GlobalStmt {
    children_method!(variables, VarRef);
}
