//! Syntax kinds for the Lezer grammar language.
//!
//! One `SyntaxKind` enum covers lexer tokens and parser nodes. Tokens carry
//! logos attributes and come first, so their discriminants fit a [`TokenSet`].

use logos::Logos;
use rowan::Language;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("{")]
    BraceOpen = 0,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    /// Rule properties `[name=..]` (unsupported)
    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    /// Rule parameters `<a, b>` (unsupported)
    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token("|")]
    Pipe,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token(",")]
    Comma,

    /// Precedence marker prefix: `!name`
    #[token("!")]
    Bang,

    /// Ambiguity marker prefix: `~name`
    #[token("~")]
    Tilde,

    /// Any character, in token rules
    #[token("_")]
    Underscore,

    #[token("=")]
    Equals,

    /// `@top`, `@tokens`, `@digit`, ...
    #[regex(r"@[a-zA-Z][a-zA-Z0-9_]*")]
    AtName,

    #[regex(r"\$\[(?:[^\]\\]|\\.)*\]")]
    CharClass,

    #[regex(r"!\[(?:[^\]\\]|\\.)*\]")]
    NegCharClass,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    Str,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Id,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    TopRule,
    Rule,
    TokensBlock,
    TokenPrecedence,
    SkipBlock,
    Precedence,
    Directive,
    Unsupported,
    Body,
    Choice,
    Seq,
    Repeat,
    Ref,
    Literal,
    CharSet,
    Builtin,
    AnyChar,
    Group,
    Marker,

    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    fn from_raw(raw: u16) -> Self {
        assert!(raw < __LAST as u16, "raw syntax kind {raw} out of range");
        // SAFETY: repr(u16) with contiguous discriminants below `__LAST`
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Rowan language tag for Lezer grammar trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LezerGrammar {}

impl Language for LezerGrammar {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<LezerGrammar>;
pub type SyntaxToken = rowan::SyntaxToken<LezerGrammar>;

/// Bitset of token kinds; discriminants must be below 64.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            assert!((kinds[i] as u16) < 64, "kind exceeds TokenSet capacity");
            bits |= 1 << kinds[i] as u16;
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as u16) < 64 && self.0 & (1 << kind as u16) != 0
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds = (0..64u16)
            .filter(|&bit| self.0 & (1 << bit) != 0)
            .map(SyntaxKind::from_raw);
        f.debug_set().entries(kinds).finish()
    }
}

/// Token sets used for lookahead and recovery.
pub mod token_sets {
    use super::*;

    /// FIRST set of a sequence item.
    pub const ATOM_FIRST: TokenSet = TokenSet::new(&[
        Id,
        Str,
        CharClass,
        NegCharClass,
        Underscore,
        ParenOpen,
        AtName,
        Bang,
        Tilde,
    ]);

    pub const REPEAT_OPS: TokenSet = TokenSet::new(&[Star, Plus, Question]);

    /// Tokens that end a sequence without being consumed by it.
    pub const SEQ_END: TokenSet = TokenSet::new(&[Pipe, BraceClose, ParenClose, BraceOpen]);

    /// Synchronization points between top-level declarations.
    pub const ITEM_RECOVERY: TokenSet = TokenSet::new(&[Id, AtName]);

    pub const PRECEDENCE_ENTRY: TokenSet = TokenSet::new(&[Id, Str]);
}
