//! `peek`/`peek_not`: non-consuming existence checks. Both always
//! restore the reader to its entry position regardless of outcome — the
//! one deliberate exception to "`Branch::Taken` means don't rewind past it",
//! since a peek's entire contract is "look, don't touch".

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct Peek<R>(pub R);

pub fn peek<R>(rule: R) -> Peek<R> {
    Peek(rule)
}

impl<E: Encoding, R: BranchRule<E>> Rule<E> for Peek<R> {
    type Output = ();
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(()) => Ok(()),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::PeekFailure, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for Peek<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        let outcome = self.0.try_parse(ctx, reader);
        *reader = entry;
        match outcome {
            Branch::Taken(_) => Branch::Taken(()),
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

/// Succeeds, without consuming, only when `R` would *not* match.
pub struct PeekNot<R>(pub R);

pub fn peek_not<R>(rule: R) -> PeekNot<R> {
    PeekNot(rule)
}

impl<E: Encoding, R: BranchRule<E>> Rule<E> for PeekNot<R> {
    type Output = ();
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(()) => Ok(()),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::Unexpected { found: crate::token::TokenKind::UNKNOWN, expected: "the prevented pattern to not match" },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for PeekNot<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        let outcome = self.0.try_parse(ctx, reader);
        *reader = entry;
        match outcome {
            Branch::Taken(_) => Branch::Backtracked,
            Branch::Backtracked => Branch::Taken(()),
            Branch::Failed => Branch::Failed,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::tokens::lit;

    #[test]
    fn peek_does_not_consume() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"abc");
        let rule = peek(lit("abc"));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(reader.position().0, 0);
    }

    #[test]
    fn peek_not_succeeds_when_inner_does_not_match() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"xyz");
        let rule = peek_not(lit("abc"));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(reader.position().0, 0);
    }
}
