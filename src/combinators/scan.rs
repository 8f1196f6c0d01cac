//! `scan(f)`: hands control to a user-provided callback that operates
//! directly on the [`Reader`], for the rare bit of grammar logic that doesn't
//! decompose into the combinator vocabulary (tables, digit-run-dependent
//! branching, whatever). Mirrors the raw reader-manipulation style
//! `tokens::Until`/`tokens::Minus` already use internally, just handed to a
//! caller-supplied closure instead of a built-in rule.
//!
//! `f` returns `Some(value)` having advanced `reader` across whatever it
//! consumed, or `None`; on `None` the reader is restored to its entry
//! position regardless of what `f` did to it, matching every other token
//! rule's "untouched on failure" contract.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

pub struct Scan<F> {
    f: F,
}

pub fn scan<F>(f: F) -> Scan<F> {
    Scan { f }
}

impl<E, F, O> Rule<E> for Scan<F>
where
    E: Encoding,
    F: Fn(&mut Reader<'_, E>) -> Option<O>,
{
    type Output = O;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let entry = *reader;
        match (self.f)(reader) {
            Some(v) => Ok(v),
            None => {
                *reader = entry;
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "a custom scan to match" },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E, F, O> BranchRule<E> for Scan<F>
where
    E: Encoding,
    F: Fn(&mut Reader<'_, E>) -> Option<O>,
{
    fn try_parse<H: Handler>(&self, _ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        match (self.f)(reader) {
            Some(v) => Branch::Taken(v),
            None => {
                *reader = entry;
                Branch::Backtracked
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;

    /// A toy scanner: consumes bytes while they're ascending, a shape no
    /// built-in combinator expresses directly.
    fn ascending_run<E: Encoding>(reader: &mut Reader<'_, E>) -> Option<Span> {
        let start = reader.position();
        let mut last = reader.peek()?;
        reader.bump();
        while let Some(b) = reader.peek() {
            if b <= last {
                break;
            }
            last = b;
            reader.bump();
        }
        Some(reader.span_since(start))
    }

    #[test]
    fn scans_an_ascending_run() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"abcx");
        let rule = scan(ascending_run::<Byte>);
        let span = Rule::parse(&rule, &mut ctx, &mut reader).expect("matches");
        assert_eq!(span.len, 4);
    }

    #[test]
    fn restores_the_reader_on_failure() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"");
        let rule = scan(ascending_run::<Byte>);
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_err());
        assert_eq!(reader.position().0, 0);
    }
}
