//! `lit<"...">` and literal-set matching.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;
use crate::trie::LiteralSet;

/// Matches a fixed string literal exactly, or not at all — never a partial
/// consumption. Matching `"hello"` against `"hello"` leaves the reader just
/// past it and records a `literal` token; against `"hell"` it backtracks
/// with the reader untouched.
#[derive(Clone, Copy, Debug)]
pub struct Lit {
    text: &'static str,
    kind: TokenKind,
}

pub fn lit(text: &'static str) -> Lit {
    Lit { text, kind: TokenKind::LITERAL }
}

impl Lit {
    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks whether `self.text` is a prefix of what's left in `reader`
    /// without consuming anything; on mismatch, returns the index of the
    /// first differing byte (used for `ExpectedLiteral::index_of_first_mismatch`).
    fn matches(&self, reader: &Reader<'_, impl Encoding>) -> Result<(), u32> {
        let bytes = self.text.as_bytes();
        for (i, &expected) in bytes.iter().enumerate() {
            match reader.peek_at(i as u32) {
                Some(found) if found == expected => continue,
                _ => return Err(i as u32),
            }
        }
        Ok(())
    }
}

impl<E: Encoding> Rule<E> for Lit {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.matches(reader) {
            Ok(()) => {
                let start = reader.position();
                for _ in 0..self.text.len() {
                    reader.bump();
                }
                let span = reader.span_since(start);
                ctx.emit_token(reader, self.kind, span);
                Ok(span)
            }
            Err(index_of_first_mismatch) => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::ExpectedLiteral { string: self.text, index_of_first_mismatch },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding> BranchRule<E> for Lit {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.matches(reader) {
            Ok(()) => {
                let start = reader.position();
                for _ in 0..self.text.len() {
                    reader.bump();
                }
                let span = reader.span_since(start);
                ctx.emit_token(reader, self.kind, span);
                Branch::Taken(span)
            }
            Err(_) => Branch::Backtracked,
        }
    }
}

/// Matches the longest of a fixed set of string literals that is a prefix
/// of the input in a single pass, via a [`LiteralSet`] trie. Typically
/// built once (e.g. behind a `OnceLock`) and shared by reference.
pub struct LiteralSetToken<'s> {
    set: &'s LiteralSet,
    kind: TokenKind,
}

impl<'s> LiteralSetToken<'s> {
    pub fn new(set: &'s LiteralSet) -> Self {
        LiteralSetToken { set, kind: TokenKind::LITERAL }
    }

    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }
}

impl<E: Encoding> Rule<E> for LiteralSetToken<'_> {
    type Output = (usize, Span);
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.set.longest_match(reader.remaining()) {
            Some(m) => {
                let start = reader.position();
                for _ in 0..m.len {
                    reader.bump();
                }
                let span = reader.span_since(start);
                ctx.emit_token(reader, self.kind, span);
                Ok((m.index, span))
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::ExhaustedChoice, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding> BranchRule<E> for LiteralSetToken<'_> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.set.longest_match(reader.remaining()) {
            Some(m) => {
                let start = reader.position();
                for _ in 0..m.len {
                    reader.bump();
                }
                let span = reader.span_since(start);
                ctx.emit_token(reader, self.kind, span);
                Branch::Taken((m.index, span))
            }
            None => Branch::Backtracked,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;

    #[test]
    fn lit_matches_exactly() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"hello world");
        let rule = lit("hello");
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(reader.position().0, 5);
    }

    #[test]
    fn lit_mismatch_reports_first_differing_index() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"help");
        let rule = lit("hello");
        assert_eq!(rule.matches(&reader), Err(3));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_err());
        assert_eq!(reader.position().0, 0);
    }
}
