//! Repetition combinators: `while_`, `while_one`, `loop_`, `times::<N>`.
//! All repeatedly probe a [`BranchRule`] child, stopping on the first
//! `Backtracked` (a clean end of the repetition) and propagating `Failed`
//! immediately (a downstream error partway through one iteration is never a
//! backtrack opportunity for the repetition as a whole).

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

/// Zero or more repetitions, collecting every iteration's value.
pub struct While<R>(pub R);

pub fn while_<R>(rule: R) -> While<R> {
    While(rule)
}

impl<E: Encoding, R: BranchRule<E>> Rule<E> for While<R> {
    type Output = Vec<R::Output>;
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let mut out = Vec::new();
        loop {
            match self.0.try_parse(ctx, reader) {
                Branch::Taken(v) => out.push(v),
                Branch::Backtracked => return Ok(out),
                Branch::Failed => return Err(Failed),
            }
        }
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for While<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match Rule::parse(self, ctx, reader) {
            Ok(out) => Branch::Taken(out),
            Err(_) => Branch::Failed,
        }
    }
}

/// One or more repetitions; fails (reader untouched) if the first iteration
/// doesn't match.
pub struct WhileOne<R>(pub R);

pub fn while_one<R>(rule: R) -> WhileOne<R> {
    WhileOne(rule)
}

impl<E: Encoding, R: BranchRule<E>> Rule<E> for WhileOne<R> {
    type Output = Vec<R::Output>;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let mut out = Vec::new();
        loop {
            match self.0.try_parse(ctx, reader) {
                Branch::Taken(v) => out.push(v),
                Branch::Backtracked => break,
                Branch::Failed => return Err(Failed),
            }
        }
        if out.is_empty() {
            let pos = reader.position();
            ctx.emit_error(ParseError::new(
                ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "at least one repetition" },
                Span { offset: pos.0, len: 0 },
            ));
            return Err(Failed);
        }
        Ok(out)
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for WhileOne<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(first) => {
                let mut out = vec![first];
                loop {
                    match self.0.try_parse(ctx, reader) {
                        Branch::Taken(v) => out.push(v),
                        Branch::Backtracked => return Branch::Taken(out),
                        Branch::Failed => return Branch::Failed,
                    }
                }
            }
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

/// Repeats `R` (its own body, not probed as a branch) until a [`Break`]
/// reached while parsing it requests a stop, counting iterations — an
/// unbounded "parse `R` until a `break_` inside it fires" shape, distinct
/// from [`While`]'s "stop on first backtrack": here the body decides when
/// to stop by constructing its own termination condition (typically
/// `choice![break_after_some_check, body_item]`), not by failing to match.
///
/// Not a [`BranchRule`] — an open-ended "run until told to stop" construct
/// has no natural non-destructive probe the way a bounded repetition does.
pub struct Loop<R>(pub R);

pub fn loop_<R>(rule: R) -> Loop<R> {
    Loop(rule)
}

impl<E: Encoding, R: Rule<E>> Rule<E> for Loop<R> {
    type Output = u32;
    const IS_BRANCH: bool = false;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let mut guard = ctx.enter_loop();
        let mut count = 0u32;
        loop {
            match self.0.parse(&mut guard, reader) {
                Ok(_) => {
                    count += 1;
                    if guard.break_requested() {
                        return Ok(count);
                    }
                }
                Err(Failed) => return Err(Failed),
            }
        }
    }
}

/// `break_()` (paired with [`Loop`]): signals the innermost enclosing
/// `loop_` to stop once the iteration currently parsing it finishes.
/// Unconditional and non-consuming, so it composes as one arm of a
/// `choice!`/`opt` inside the loop body without affecting branch dispatch.
pub struct Break;

pub fn break_() -> Break {
    Break
}

impl<E: Encoding> Rule<E> for Break {
    type Output = ();
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, _reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        ctx.request_break();
        Ok(())
    }
}

impl<E: Encoding> BranchRule<E> for Break {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        Branch::Taken(Rule::parse(self, ctx, reader).expect("Break::parse never fails"))
    }
}

/// Exactly `N` repetitions. Backtracks (reader untouched) if the first
/// iteration doesn't match; a failure on any later iteration propagates as
/// `Failed`, never a backtrack, since the sequence is already committed.
pub struct Times<const N: usize, R>(pub R);

pub fn times<const N: usize, R>(rule: R) -> Times<N, R> {
    Times(rule)
}

impl<E: Encoding, R: Rule<E>, const N: usize> Rule<E> for Times<N, R> {
    type Output = Vec<R::Output>;
    const IS_BRANCH: bool = R::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let mut out = Vec::with_capacity(N);
        for _ in 0..N {
            out.push(self.0.parse(ctx, reader)?);
        }
        Ok(out)
    }
}

impl<E: Encoding, R: BranchRule<E>, const N: usize> BranchRule<E> for Times<N, R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        if N == 0 {
            return Branch::Taken(Vec::new());
        }
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(first) => {
                let mut out = Vec::with_capacity(N);
                out.push(first);
                for _ in 1..N {
                    match self.0.parse(ctx, reader) {
                        Ok(v) => out.push(v),
                        Err(_) => return Branch::Failed,
                    }
                }
                Branch::Taken(out)
            }
            Branch::Backtracked => Branch::Backtracked,
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

    fn run<R: BranchRule<Byte>>(rule: &R, input: &[u8]) -> ParseResult<R::Output> {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        rule.parse(&mut ctx, &mut reader)
    }

    #[test]
    fn while_matches_zero_times() {
        let rule = while_(lit("a"));
        let out = run(&rule, b"bbb").expect("while_ never fails");
        assert!(out.is_empty());
    }

    #[test]
    fn while_one_requires_at_least_one() {
        let rule = while_one(lit("a"));
        assert!(run(&rule, b"bbb").is_err());
        let out = run(&rule, b"aaab").expect("three a's");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn times_requires_exactly_n() {
        let rule = times::<3, _>(lit("a"));
        assert!(run(&rule, b"aa").is_err());
        let out = run(&rule, b"aaa").expect("exactly three");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn loop_stops_when_break_fires() {
        use crate::combinators::capture::capture;
        use crate::combinators::choice::Choice;

        let rule = loop_(Choice(lit("a"), capture(break_())));
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"aaab");
        let count = Rule::parse(&rule, &mut ctx, &mut reader).expect("loop completes via break_");
        // three "a" iterations, then one iteration where `break_` fires
        // instead (it never consumes the trailing "b").
        assert_eq!(count, 4);
        assert_eq!(reader.position().0, 3);
    }
}
