//! Member access extraction: `->`, `?->` and `::`.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::{ScopeMember, SymbolKind, SymbolReference, SymbolSpan};
use crate::php::ast::{CallExpr, Expr, MemberExpr, NameRef, ScopedExpr, VarRef};
use crate::php::{AstNode, SyntaxKind, SyntaxNode, SyntaxToken};

/// `Class::member` followed by whatever is chained onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticLookup {
    pub class: SmolStr,
    pub class_range: TextRange,
    /// The `::` member first, then each chained member in order.
    pub links: Vec<SymbolReference>,
}

/// `::` members grouped by what they resolve to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeResolutionMembers {
    pub constants: Vec<SymbolReference>,
    pub static_methods: Vec<SymbolReference>,
    pub static_properties: Vec<SymbolReference>,
    /// `Foo::` with no member yet.
    pub pending: Vec<SymbolReference>,
}

impl ScopeResolutionMembers {
    pub fn len(&self) -> usize {
        self.constants.len()
            + self.static_methods.len()
            + self.static_properties.len()
            + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every static lookup rooted at a class name, in source order.
pub fn static_lookups(root: &SyntaxNode) -> Vec<StaticLookup> {
    root.descendants()
        .filter_map(ScopedExpr::cast)
        .filter_map(|scoped| {
            let class = scoped
                .receiver()
                .map(Expr::unparenthesized)
                .and_then(|r| NameRef::cast(r.syntax().clone()))
                .and_then(|name| name.name())?;
            let first = Access::new(scoped.syntax())?.reference()?;
            let mut links = vec![first];
            let mut current = scoped.syntax().clone();
            while let Some(parent) = continuing_parent(&current) {
                if let Some(link) = Access::new(&parent).and_then(|a| a.reference()) {
                    links.push(SymbolReference {
                        kind: SymbolKind::StaticLookup,
                        ..link
                    });
                }
                current = parent;
            }
            Some(StaticLookup {
                class: SmolStr::new(class.text()),
                class_range: class.text_range(),
                links,
            })
        })
        .collect()
}

pub fn scope_resolution_members(root: &SyntaxNode) -> ScopeResolutionMembers {
    let mut members = ScopeResolutionMembers::default();
    for node in root.descendants() {
        let Some(access) = Access::new(&node).filter(|a| a.scoped) else {
            continue;
        };
        let Some(reference) = access.reference() else {
            continue;
        };
        let bucket = match access.scope_member() {
            ScopeMember::Constant => &mut members.constants,
            ScopeMember::StaticMethod => &mut members.static_methods,
            ScopeMember::StaticProperty => &mut members.static_properties,
            ScopeMember::Pending => &mut members.pending,
        };
        bucket.push(reference);
    }
    members
}

/// `->` members whose chain does not start at a class name.
pub fn instance_members(root: &SyntaxNode) -> Vec<SymbolReference> {
    root.descendants()
        .filter_map(|node| Access::new(&node))
        .filter_map(|access| access.reference())
        .filter(|r| r.kind == SymbolKind::InstanceMember)
        .collect()
}

/// Variables, function calls and member accesses, ordered by start offset.
pub fn symbol_references(root: &SyntaxNode) -> Vec<SymbolReference> {
    let mut references = Vec::new();
    for node in root.descendants() {
        match node.kind() {
            SyntaxKind::VAR_REF => {
                if let Some(token) = VarRef::cast(node).and_then(|v| v.variable()) {
                    references.push(named(&token, SymbolKind::Variable, Vec::new()));
                }
            }
            SyntaxKind::CALL_EXPR => {
                let function = CallExpr::cast(node)
                    .and_then(|call| call.callee())
                    .and_then(|callee| NameRef::cast(callee.syntax().clone()))
                    .and_then(|name| name.name());
                if let Some(token) = function {
                    references.push(named(&token, SymbolKind::Call, Vec::new()));
                }
            }
            _ => {
                if let Some(reference) = Access::new(&node).and_then(|a| a.reference()) {
                    references.push(reference);
                }
            }
        }
    }
    references.sort_by_key(|r| r.span.start());
    references
}

/// The access whose operator ends exactly at `offset`, as an empty insertion point.
pub fn insertion_at(root: &SyntaxNode, offset: TextSize) -> Option<SymbolReference> {
    root.descendants()
        .filter_map(|node| Access::new(&node))
        .find(|access| access.operator.text_range().end() == offset)
        .and_then(|access| access.reference())
        .map(|reference| SymbolReference {
            name: SmolStr::default(),
            span: SymbolSpan::Insertion(offset),
            ..reference
        })
}

fn named(token: &SyntaxToken, kind: SymbolKind, path: Vec<SmolStr>) -> SymbolReference {
    SymbolReference {
        name: SmolStr::new(token.text()),
        kind,
        span: SymbolSpan::Range(token.text_range()),
        path,
    }
}

/// A `MEMBER_EXPR` or `SCOPED_EXPR`.
struct Access {
    node: SyntaxNode,
    scoped: bool,
    receiver: Option<Expr>,
    operator: SyntaxToken,
    name: Option<SyntaxToken>,
}

impl Access {
    fn new(node: &SyntaxNode) -> Option<Self> {
        if let Some(member) = MemberExpr::cast(node.clone()) {
            Some(Self {
                node: node.clone(),
                scoped: false,
                receiver: member.receiver(),
                operator: member.operator()?,
                name: member.name(),
            })
        } else {
            let scoped = ScopedExpr::cast(node.clone())?;
            Some(Self {
                node: node.clone(),
                scoped: true,
                receiver: scoped.receiver(),
                operator: scoped.operator()?,
                name: scoped.member(),
            })
        }
    }

    fn scope_member(&self) -> ScopeMember {
        match &self.name {
            None => ScopeMember::Pending,
            Some(name) if name.kind() == SyntaxKind::VARIABLE => ScopeMember::StaticProperty,
            Some(_) if is_callee(&self.node) => ScopeMember::StaticMethod,
            Some(_) => ScopeMember::Constant,
        }
    }

    fn reference(&self) -> Option<SymbolReference> {
        let chain = self.receiver.clone().map(Chain::of).unwrap_or_default();
        let kind = if self.scoped {
            SymbolKind::ScopeResolutionMember(self.scope_member())
        } else if chain.static_root {
            SymbolKind::StaticLookup
        } else {
            SymbolKind::InstanceMember
        };
        Some(match &self.name {
            Some(name) => named(name, kind, chain.path),
            None => SymbolReference {
                name: SmolStr::default(),
                kind,
                span: SymbolSpan::Insertion(self.operator.text_range().end()),
                path: chain.path,
            },
        })
    }
}

/// Receiver names from the root of an access chain.
#[derive(Debug, Default)]
struct Chain {
    path: Vec<SmolStr>,
    accesses: usize,
    /// First access is `Class::`.
    static_root: bool,
}

impl Chain {
    fn of(expr: Expr) -> Chain {
        let expr = expr.unparenthesized();
        let node = expr.syntax().clone();
        match expr.kind() {
            SyntaxKind::VAR_REF => Chain::rooted(VarRef::cast(node).and_then(|v| v.variable())),
            SyntaxKind::NAME_REF => Chain::rooted(NameRef::cast(node).and_then(|n| n.name())),
            SyntaxKind::CALL_EXPR | SyntaxKind::INDEX_EXPR => node
                .children()
                .find_map(Expr::cast)
                .map(Chain::of)
                .unwrap_or_default(),
            _ => {
                let Some(access) = Access::new(&node) else {
                    return Chain::default();
                };
                let receiver = access.receiver.map(Expr::unparenthesized);
                let class_receiver = receiver
                    .as_ref()
                    .is_some_and(|r| r.kind() == SyntaxKind::NAME_REF);
                let mut chain = receiver.map(Chain::of).unwrap_or_default();
                if chain.accesses == 0 {
                    chain.static_root = access.scoped && class_receiver;
                }
                chain.accesses += 1;
                chain
                    .path
                    .push(access.name.map(|t| SmolStr::new(t.text())).unwrap_or_default());
                chain
            }
        }
    }

    fn rooted(token: Option<SyntaxToken>) -> Chain {
        Chain {
            path: token.map(|t| SmolStr::new(t.text())).into_iter().collect(),
            ..Chain::default()
        }
    }
}

/// True when `node` is the called expression of its parent call.
fn is_callee(node: &SyntaxNode) -> bool {
    node.parent()
        .and_then(CallExpr::cast)
        .and_then(|call| call.callee())
        .is_some_and(|callee| callee.syntax() == node)
}

/// The parent that continues the chain `node` is the receiver of.
fn continuing_parent(node: &SyntaxNode) -> Option<SyntaxNode> {
    let parent = node.parent()?;
    let continues = matches!(
        parent.kind(),
        SyntaxKind::CALL_EXPR
            | SyntaxKind::INDEX_EXPR
            | SyntaxKind::MEMBER_EXPR
            | SyntaxKind::SCOPED_EXPR
    );
    let first = parent.children().find_map(Expr::cast)?;
    (continues && first.syntax() == node).then_some(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::parse;

    fn root(input: &str) -> SyntaxNode {
        parse(input).syntax()
    }

    fn names(references: &[SymbolReference]) -> Vec<&str> {
        references.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_static_lookup_chain() {
        let lookups = static_lookups(&root("User::where('a', 1)->first()->name;"));
        assert_eq!(lookups.len(), 1);
        let lookup = &lookups[0];
        assert_eq!(lookup.class, "User");
        assert_eq!(lookup.class_range, TextRange::new(0.into(), 4.into()));
        assert_eq!(names(&lookup.links), vec!["where", "first", "name"]);
        assert_eq!(
            lookup.links[0].kind,
            SymbolKind::ScopeResolutionMember(ScopeMember::StaticMethod)
        );
        assert!(lookup.links[1..].iter().all(|l| l.kind == SymbolKind::StaticLookup));
        assert_eq!(lookup.links[2].path, vec!["User", "where", "first"]);
    }

    #[test]
    fn test_variable_receiver_is_not_a_static_lookup() {
        assert!(static_lookups(&root("$model::create();")).is_empty());
    }

    #[test]
    fn test_scope_resolution_members_by_kind() {
        let members = scope_resolution_members(&root(
            "Status::ACTIVE; Str::upper($a); Config::$items; Foo::class; Bar::",
        ));
        assert_eq!(names(&members.constants), vec!["ACTIVE", "class"]);
        assert_eq!(names(&members.static_methods), vec!["upper"]);
        assert_eq!(names(&members.static_properties), vec!["$items"]);
        assert_eq!(members.pending.len(), 1);
        assert_eq!(
            members.pending[0].span,
            SymbolSpan::Insertion(TextSize::new(65))
        );
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn test_instance_members() {
        let members = instance_members(&root("$user->posts()->first()?->title; User::find(1)->name;"));
        assert_eq!(names(&members), vec!["title", "first", "posts"]);
        let title = &members[0];
        assert_eq!(title.path, vec!["$user", "posts", "first"]);
        assert_eq!(title.kind, SymbolKind::InstanceMember);
    }

    #[test]
    fn test_missing_member_becomes_insertion() {
        let members = instance_members(&root("echo $obj->;"));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].span, SymbolSpan::Insertion(TextSize::new(11)));
        assert!(members[0].span.start() > members[0].span.end());
        assert_eq!(members[0].path, vec!["$obj"]);
    }

    #[test]
    fn test_insertion_at_operator_end() {
        let tree = root("echo $obj->foo();");
        let found = insertion_at(&tree, TextSize::new(11)).expect("insertion point");
        assert_eq!(found.name, "");
        assert_eq!(found.kind, SymbolKind::InstanceMember);
        assert_eq!(found.span, SymbolSpan::Insertion(TextSize::new(11)));
        assert!(insertion_at(&tree, TextSize::new(12)).is_none());
        assert!(insertion_at(&tree, TextSize::new(9)).is_none());
    }

    #[test]
    fn test_insertion_after_scope_operator() {
        let found = insertion_at(&root("Route::has('x');"), TextSize::new(7)).expect("insertion");
        assert_eq!(
            found.kind,
            SymbolKind::ScopeResolutionMember(ScopeMember::StaticMethod)
        );
        assert_eq!(found.path, vec!["Route"]);
    }

    #[test]
    fn test_symbol_references_sorted() {
        let references = symbol_references(&root("$a = route('home') . $b->c;"));
        let summary: Vec<_> = references.iter().map(|r| (r.name.as_str(), r.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("$a", SymbolKind::Variable),
                ("route", SymbolKind::Call),
                ("$b", SymbolKind::Variable),
                ("c", SymbolKind::InstanceMember),
            ]
        );
    }
}
