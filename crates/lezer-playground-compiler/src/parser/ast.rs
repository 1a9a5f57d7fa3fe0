//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::unescape::{CharRange, parse_char_set, unescape_string};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(TopRule, TopRule);
ast_node!(Rule, Rule);
ast_node!(TokensBlock, TokensBlock);
ast_node!(TokenPrecedence, TokenPrecedence);
ast_node!(SkipBlock, SkipBlock);
ast_node!(Precedence, Precedence);
ast_node!(Directive, Directive);
ast_node!(Unsupported, Unsupported);
ast_node!(Body, Body);
ast_node!(Choice, Choice);
ast_node!(Seq, Seq);
ast_node!(Repeat, Repeat);
ast_node!(Ref, Ref);
ast_node!(Literal, Literal);
ast_node!(CharSet, CharSet);
ast_node!(Builtin, Builtin);
ast_node!(AnyChar, AnyChar);
ast_node!(Group, Group);
ast_node!(Marker, Marker);

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Top(TopRule),
    Rule(Rule),
    Tokens(TokensBlock),
    Skip(SkipBlock),
    Precedence(Precedence),
    Directive(Directive),
    Unsupported(Unsupported),
}

impl Item {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TopRule => TopRule::cast(node).map(Item::Top),
            SyntaxKind::Rule => Rule::cast(node).map(Item::Rule),
            SyntaxKind::TokensBlock => TokensBlock::cast(node).map(Item::Tokens),
            SyntaxKind::SkipBlock => SkipBlock::cast(node).map(Item::Skip),
            SyntaxKind::Precedence => Precedence::cast(node).map(Item::Precedence),
            SyntaxKind::Directive => Directive::cast(node).map(Item::Directive),
            SyntaxKind::Unsupported => Unsupported::cast(node).map(Item::Unsupported),
            _ => None,
        }
    }
}

/// Expression inside a rule body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Choice(Choice),
    Seq(Seq),
    Repeat(Repeat),
    Ref(Ref),
    Literal(Literal),
    CharSet(CharSet),
    Builtin(Builtin),
    AnyChar(AnyChar),
    Group(Group),
    Marker(Marker),
    Unsupported(Unsupported),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Choice => Choice::cast(node).map(Expr::Choice),
            SyntaxKind::Seq => Seq::cast(node).map(Expr::Seq),
            SyntaxKind::Repeat => Repeat::cast(node).map(Expr::Repeat),
            SyntaxKind::Ref => Ref::cast(node).map(Expr::Ref),
            SyntaxKind::Literal => Literal::cast(node).map(Expr::Literal),
            SyntaxKind::CharSet => CharSet::cast(node).map(Expr::CharSet),
            SyntaxKind::Builtin => Builtin::cast(node).map(Expr::Builtin),
            SyntaxKind::AnyChar => AnyChar::cast(node).map(Expr::AnyChar),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Marker => Marker::cast(node).map(Expr::Marker),
            SyntaxKind::Unsupported => Unsupported::cast(node).map(Expr::Unsupported),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Choice(n) => n.as_cst(),
            Expr::Seq(n) => n.as_cst(),
            Expr::Repeat(n) => n.as_cst(),
            Expr::Ref(n) => n.as_cst(),
            Expr::Literal(n) => n.as_cst(),
            Expr::CharSet(n) => n.as_cst(),
            Expr::Builtin(n) => n.as_cst(),
            Expr::AnyChar(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Marker(n) => n.as_cst(),
            Expr::Unsupported(n) => n.as_cst(),
        }
    }
}

impl Root {
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }
}

impl TopRule {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Id)
    }

    pub fn body(&self) -> Option<Body> {
        self.0.children().find_map(Body::cast)
    }
}

impl Rule {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Id)
    }

    pub fn body(&self) -> Option<Body> {
        self.0.children().find_map(Body::cast)
    }
}

impl TokensBlock {
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.0.children().filter_map(Rule::cast)
    }

    pub fn precedences(&self) -> impl Iterator<Item = TokenPrecedence> + '_ {
        self.0.children().filter_map(TokenPrecedence::cast)
    }
}

impl TokenPrecedence {
    /// Entries in priority order: `Ref` or `Literal`.
    pub fn entries(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl SkipBlock {
    pub fn body(&self) -> Option<Body> {
        self.0.children().find_map(Body::cast)
    }
}

impl Body {
    /// `None` for an empty body `{}`.
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Choice {
    pub fn alternatives(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Seq {
    pub fn items(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatOp {
    ZeroOrMore,
    OneOrMore,
    Optional,
}

impl Repeat {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// The operator is the last token of the node; nested repeats own their own.
    pub fn op(&self) -> Option<RepeatOp> {
        let last = self.0.last_token()?;
        match last.kind() {
            SyntaxKind::Star => Some(RepeatOp::ZeroOrMore),
            SyntaxKind::Plus => Some(RepeatOp::OneOrMore),
            SyntaxKind::Question => Some(RepeatOp::Optional),
            _ => None,
        }
    }
}

impl Ref {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Id)
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Str)
    }

    /// Unescaped content; `None` if an escape sequence is malformed.
    pub fn value(&self) -> Option<String> {
        let token = self.token()?;
        let text = token.text();
        unescape_string(&text[1..text.len() - 1])
    }
}

impl CharSet {
    pub fn is_negated(&self) -> bool {
        token(&self.0, SyntaxKind::NegCharClass).is_some()
    }

    /// Ranges between the brackets; `None` if malformed.
    pub fn ranges(&self) -> Option<Vec<CharRange>> {
        let token = self.0.first_token()?;
        let text = token.text();
        // `$[` or `![` prefix, `]` suffix
        parse_char_set(&text[2..text.len() - 1])
    }
}

impl Builtin {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::AtName)
    }
}

impl Group {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Marker {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Id)
    }
}
