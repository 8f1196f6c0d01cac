//! Token kinds and the `(kind, span)` pair emitted for every matched atom.
//!
//! Predefined kinds occupy the top of the `u16` range and user kinds occupy
//! the bottom, so a grammar's custom token kinds never collide with the
//! ones the engine itself emits (whitespace, EOF, ...).

use crate::span::Span;

/// A token kind. An open enumeration: predefined kinds live at
/// `PREDEFINED_BASE..=u16::MAX`, user kinds at `0..PREDEFINED_BASE`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TokenKind(pub u16);

impl TokenKind {
    pub const PREDEFINED_BASE: u16 = u16::MAX - 16;

    pub const UNKNOWN: TokenKind = TokenKind(Self::PREDEFINED_BASE);
    pub const ERROR: TokenKind = TokenKind(Self::PREDEFINED_BASE + 1);
    pub const WHITESPACE: TokenKind = TokenKind(Self::PREDEFINED_BASE + 2);
    pub const ANY: TokenKind = TokenKind(Self::PREDEFINED_BASE + 3);
    pub const LITERAL: TokenKind = TokenKind(Self::PREDEFINED_BASE + 4);
    pub const POSITION: TokenKind = TokenKind(Self::PREDEFINED_BASE + 5);
    pub const EOF: TokenKind = TokenKind(Self::PREDEFINED_BASE + 6);
    pub const IDENTIFIER: TokenKind = TokenKind(Self::PREDEFINED_BASE + 7);
    pub const DIGITS: TokenKind = TokenKind(Self::PREDEFINED_BASE + 8);

    /// Build a user-defined token kind. Panics if `value` collides with the
    /// predefined range.
    pub const fn user(value: u16) -> Self {
        assert!(value < Self::PREDEFINED_BASE, "user token kind collides with a predefined kind");
        TokenKind(value)
    }

    pub fn is_predefined(self) -> bool {
        self.0 >= Self::PREDEFINED_BASE
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UNKNOWN => "unknown",
            Self::ERROR => "error",
            Self::WHITESPACE => "whitespace",
            Self::ANY => "any",
            Self::LITERAL => "literal",
            Self::POSITION => "position",
            Self::EOF => "eof",
            Self::IDENTIFIER => "identifier",
            Self::DIGITS => "digits",
            _ => "user",
        }
    }
}

/// A matched token: a kind and the span it covers.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }
}

/// Maps a rule type to a user [`TokenKind`] for tracing/tree actions that
/// want a stable kind for rules which don't declare one via `.kind(k)`.
pub trait TokenKindMap {
    fn token_kind(&self) -> TokenKind {
        TokenKind::UNKNOWN
    }
}
