//! Source locations: byte offsets, spans, and lexemes.

use std::fmt;

/// A position in the input, as an opaque byte offset.
///
/// Stable across reader clones; may be rewound or fast-forwarded through
/// [`crate::reader::Reader::set_position`].
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Pos(pub u32);

impl Pos {
    pub const fn zero() -> Self {
        Pos(0)
    }
}

/// A contiguous, non-owning range `[offset, offset + len)` in the input.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
#[non_exhaustive]
pub struct Span {
    pub offset: u32,
    pub len: u32,
}

impl Span {
    pub const fn empty() -> Self {
        Span { offset: 0, len: 0 }
    }

    pub const fn new(start: Pos, end: Pos) -> Self {
        Span { offset: start.0, len: end.0 - start.0 }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> Pos {
        Pos(self.offset)
    }

    pub fn end(&self) -> Pos {
        Pos(self.offset + self.len)
    }

    /// The smallest span that covers both `self` and `other`, including any
    /// gap between them.
    pub fn covers(self, other: Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.len).max(other.offset + other.len);
        Span { offset: start, len: end - start }
    }

    /// A zero-length span that starts right after this one.
    pub fn after(self) -> Span {
        Span { offset: self.offset + self.len, len: 0 }
    }

    /// Whether `self` immediately follows `other` with no gap.
    pub fn follows_from(&self, other: &Span) -> bool {
        self.offset == other.offset + other.len
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.offset, self.offset + self.len)
    }
}

/// A matched input range, borrowing the underlying source bytes.
///
/// Unlike [`Span`] this carries the actual slice, so callbacks can read the
/// matched text without going back through a reader.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Lexeme<'a> {
    span: Span,
    text: &'a [u8],
}

impl<'a> Lexeme<'a> {
    pub fn new(span: Span, text: &'a [u8]) -> Self {
        debug_assert_eq!(span.len as usize, text.len());
        Lexeme { span, text }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.text
    }

    /// The matched text as `str`.
    ///
    /// # Panics
    /// Panics if the lexeme isn't valid UTF-8; grammars operating on the
    /// `Byte` encoding should use [`Lexeme::as_bytes`] instead.
    pub fn as_str(&self) -> &'a str {
        std::str::from_utf8(self.text).expect("lexeme is not valid utf-8")
    }
}
