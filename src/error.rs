//! The error taxonomy. Errors are values, never exceptions: a combinator
//! that fails calls [`crate::context::Context::emit_error`] and then either
//! recovers (returns `Ok`) or propagates `Err(Failed)`.
//!
//! Presentation (line/column computation, colored snippets) is out of
//! scope for this crate; `ParseError`'s `Display` impl is a
//! `thiserror`-derived one-line message, with no `RenderedError`/
//! `Snippet`-style rendering machinery attached.

use std::fmt;

use crate::span::Span;
use crate::token::TokenKind;

/// A user-defined error tag, for `error<Tag>`. Implementors describe their
/// own message; the engine only needs a `Span` and a `Display` impl.
pub trait ErrorTag: fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T: fmt::Debug + fmt::Display + Send + Sync + 'static> ErrorTag for T {}

/// The tagged error payload. One variant per documented tag; `Custom`
/// carries whatever tag type a grammar constructed via `error::<Tag>()`.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("expected the literal {string:?}")]
    ExpectedLiteral { string: &'static str, index_of_first_mismatch: u32 },

    #[error("expected the keyword {string:?}")]
    ExpectedKeyword { string: &'static str },

    #[error("expected a character of class {class_name}")]
    ExpectedCharClass { class_name: &'static str },

    #[error("no alternative matched")]
    ExhaustedChoice,

    #[error("no switch case matched")]
    ExhaustedSwitch,

    #[error("this branch of a combination has already been matched")]
    CombinationDuplicate,

    #[error("missing closing delimiter")]
    MissingDelimiter,

    #[error("invalid escape sequence")]
    InvalidEscapeSequence,

    #[error("identifier {found:?} is reserved")]
    ReservedIdentifier { found: String },

    #[error("number has a forbidden leading zero")]
    ForbiddenLeadingZero,

    #[error("the excluded pattern also matched")]
    MinusFailure,

    #[error("lookahead did not find the expected token before the limit")]
    LookaheadFailure,

    #[error("unexpected input, did not expect this token to be present")]
    PeekFailure,

    #[error("unexpected token {found}, expected {expected}")]
    Unexpected { found: TokenKind, expected: &'static str },

    #[error("captured identifier does not match the previous occurrence")]
    DifferentIdentifier,

    #[error("combination elements were matched an unequal number of times")]
    UnequalCounts,

    #[error("recursion depth exceeded the production's configured maximum")]
    RecursionExceeded,

    #[error("{0}")]
    Custom(Box<dyn ErrorTag>),
}

/// A parse error: a tagged kind plus the span it applies to.
#[derive(thiserror::Error, Debug)]
#[error("{kind} (at {span})")]
#[non_exhaustive]
pub struct ParseError {
    pub kind: ErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }
}
