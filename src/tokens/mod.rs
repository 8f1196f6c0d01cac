//! The token / char-class layer: primitive, bounded consumers with no
//! production nesting. Every type here implements both [`Rule`] (ordinary,
//! error-emitting parsing) and [`BranchRule`] (silent probing for
//! combinators like `choice`/`opt` to build on).
//!
//! The shared shape: a `try_match` inherent method does the actual
//! reader-consuming work and returns `Some(span)` on success, `None` (reader
//! untouched) on failure. `Rule::parse` turns a `None` into an emitted error;
//! `BranchRule::try_parse` turns it into a silent `Backtracked` — emitting
//! `exhausted_choice` for the `Backtracked` case is the caller's job, but a
//! token rule used standalone still has to report its own failure.

mod bom;
mod codepoint_token;
mod digit;
mod identifier;
mod keyword;
mod literal;

pub use bom::{bom, Bom, BomEncoding, Endian};
pub use codepoint_token::{code_point, CodePointToken};
pub use digit::{digits, n_digits, Base, Digit, Digits, NDigits};
pub use identifier::{identifier, Identifier};
pub use keyword::{keyword, Keyword};
pub use literal::{lit, Lit, LiteralSetToken};

use crate::charclass::ByteClass;
use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

/// Wraps a [`ByteClass`] as a token rule matching exactly one code unit in
/// that class. `ascii::alpha()`, `ascii::digit()`, etc. in `src/dsl.rs` are
/// thin constructors around this.
#[derive(Clone, Copy, Debug)]
pub struct Class<C> {
    class: C,
    kind: TokenKind,
}

impl<C: ByteClass> Class<C> {
    pub fn new(class: C) -> Self {
        Class { class, kind: TokenKind::UNKNOWN }
    }

    /// Overrides the token kind recorded for a successful match.
    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<Span> {
        let start = reader.position();
        let byte = reader.peek()?;
        if !self.class.contains(byte) {
            return None;
        }
        reader.bump();
        Some(reader.span_since(start))
    }
}

impl<E: Encoding, C: ByteClass> Rule<E> for Class<C> {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, self.kind, span);
                Ok(span)
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::ExpectedCharClass { class_name: C::NAME },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(crate::engine::Failed)
            }
        }
    }
}

impl<E: Encoding, C: ByteClass> crate::engine::BranchRule<E> for Class<C> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, self.kind, span);
                Branch::Taken(span)
            }
            None => Branch::Backtracked,
        }
    }
}

/// Consumes every remaining code unit until EOF. Always succeeds, including
/// on empty input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Any;

impl Any {
    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Span {
        let start = reader.position();
        while reader.peek().is_some() {
            reader.bump();
        }
        reader.span_since(start)
    }
}

impl<E: Encoding> Rule<E> for Any {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let span = self.try_match(reader);
        ctx.emit_token(reader, TokenKind::ANY, span);
        Ok(span)
    }
}

impl<E: Encoding> crate::engine::BranchRule<E> for Any {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        Branch::Taken(Rule::parse(self, ctx, reader).expect("Any::parse is infallible"))
    }
}

/// Succeeds only at end of input, consuming nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eof;

impl<E: Encoding> Rule<E> for Eof {
    type Output = ();
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        if reader.is_eof() {
            let pos = reader.position();
            ctx.emit_token(reader, TokenKind::EOF, Span { offset: pos.0, len: 0 });
            Ok(())
        } else {
            let pos = reader.position();
            ctx.emit_error(ParseError::new(ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "end of input" }, Span { offset: pos.0, len: 0 }));
            Err(crate::engine::Failed)
        }
    }
}

impl<E: Encoding> crate::engine::BranchRule<E> for Eof {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        if reader.is_eof() {
            let pos = reader.position();
            ctx.emit_token(reader, TokenKind::EOF, Span { offset: pos.0, len: 0 });
            Branch::Taken(())
        } else {
            Branch::Backtracked
        }
    }
}

/// Matches a single `\n`, optionally preceded by `\r`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Newline;

impl Newline {
    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<Span> {
        let start = reader.position();
        match reader.peek() {
            Some(b'\r') => {
                reader.bump();
                if reader.peek() == Some(b'\n') {
                    reader.bump();
                    Some(reader.span_since(start))
                } else {
                    reader.set_position(start);
                    None
                }
            }
            Some(b'\n') => {
                reader.bump();
                Some(reader.span_since(start))
            }
            _ => None,
        }
    }
}

impl<E: Encoding> Rule<E> for Newline {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, TokenKind::UNKNOWN, span);
                Ok(span)
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "a newline" }, Span { offset: pos.0, len: 0 }));
                Err(crate::engine::Failed)
            }
        }
    }
}

impl<E: Encoding> crate::engine::BranchRule<E> for Newline {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, TokenKind::UNKNOWN, span);
                Branch::Taken(span)
            }
            None => Branch::Backtracked,
        }
    }
}

/// A newline, or EOF — at end of input, `eol` succeeds by matching EOF.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eol;

impl<E: Encoding> Rule<E> for Eol {
    type Output = ();
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        if Newline.try_match(reader).is_some() || reader.is_eof() {
            Ok(())
        } else {
            let pos = reader.position();
            ctx.emit_error(ParseError::new(ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "end of line" }, Span { offset: pos.0, len: 0 }));
            Err(crate::engine::Failed)
        }
    }
}

impl<E: Encoding> crate::engine::BranchRule<E> for Eol {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        if Newline.try_match(reader).is_some() || reader.is_eof() {
            Branch::Taken(())
        } else {
            Branch::Backtracked
        }
    }
}

/// Consumes input until `tok` matches, inclusive of `tok` itself. Fails
/// (restoring the reader) if `tok` never matches before EOF.
pub struct Until<T>(pub T);

pub fn until<T>(tok: T) -> Until<T> {
    Until(tok)
}

impl<E: Encoding, T: crate::engine::BranchRule<E>> Rule<E> for Until<T> {
    type Output = Span;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let start = reader.position();
        loop {
            let probe = *reader;
            match self.0.try_parse(ctx, reader) {
                Branch::Taken(_) => return Ok(reader.span_since(start)),
                Branch::Failed => return Err(crate::engine::Failed),
                Branch::Backtracked => *reader = probe,
            }
            if reader.peek().is_none() {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::LookaheadFailure, Span { offset: start.0, len: pos.0 - start.0 }));
                return Err(crate::engine::Failed);
            }
            reader.bump();
        }
    }
}

impl<E: Encoding, T: crate::engine::BranchRule<E>> crate::engine::BranchRule<E> for Until<T> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        match Rule::parse(self, ctx, reader) {
            Ok(span) => Branch::Taken(span),
            Err(_) => {
                *reader = entry;
                Branch::Backtracked
            }
        }
    }
}

/// Matches `tok` unless `except` also matches at the same starting point.
/// A single-pass difference, not a general lookahead.
pub struct Minus<T, X> {
    pub token: T,
    pub except: X,
}

pub fn minus<T, X>(token: T, except: X) -> Minus<T, X> {
    Minus { token, except }
}

impl<E: Encoding, T, X> Rule<E> for Minus<T, X>
where
    T: crate::engine::BranchRule<E>,
    X: crate::engine::BranchRule<E>,
{
    type Output = T::Output;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let entry = *reader;
        if let Branch::Taken(_) = self.except.try_parse(ctx, reader) {
            *reader = entry;
            let pos = reader.position();
            ctx.emit_error(ParseError::new(ErrorKind::MinusFailure, Span { offset: pos.0, len: 0 }));
            return Err(crate::engine::Failed);
        }
        *reader = entry;
        Rule::parse(&self.token, ctx, reader)
    }
}

impl<E: Encoding, T, X> crate::engine::BranchRule<E> for Minus<T, X>
where
    T: crate::engine::BranchRule<E>,
    X: crate::engine::BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        if let Branch::Taken(_) = self.except.try_parse(ctx, reader) {
            *reader = entry;
            return Branch::Backtracked;
        }
        *reader = entry;
        self.token.try_parse(ctx, reader)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::encoding::Byte;

    fn parse_any<E: Encoding, R: Rule<E>>(rule: &R, input: &[u8]) -> (ParseResult<R::Output>, Reader<'_, E>) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, crate::context::ControlBlock::new());
        let mut reader = Reader::<E>::new(input);
        let result = rule.parse(&mut ctx, &mut reader);
        (result, reader)
    }

    #[test]
    fn any_matches_empty_input() {
        let (result, reader) = parse_any::<Byte, _>(&Any, b"");
        assert!(result.is_ok());
        assert!(reader.is_eof());
    }

    #[test]
    fn eof_succeeds_only_at_end() {
        let (result, _) = parse_any::<Byte, _>(&Eof, b"");
        assert!(result.is_ok());
        let (result, _) = parse_any::<Byte, _>(&Eof, b"x");
        assert!(result.is_err());
    }

    #[test]
    fn newline_fails_without_consuming_at_eof() {
        let (result, reader) = parse_any::<Byte, _>(&Newline, b"");
        assert!(result.is_err());
        assert_eq!(reader.position().0, 0);
    }

    #[test]
    fn eol_matches_eof() {
        let (result, _) = parse_any::<Byte, _>(&Eol, b"");
        assert!(result.is_ok());
    }
}
