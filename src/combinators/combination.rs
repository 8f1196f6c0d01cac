//! `combination`/`partial_combination`: match a fixed set of branches
//! exactly once each, in any order. Only the three-arm case is spelled out,
//! following `seq`'s "arities above the common cases are written out by
//! hand" convention — a grammar needing more arms repeats the same shape.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

/// Three branches, each matched exactly once, in any order. Reports
/// `combination_duplicate` if a branch's prefix reappears after it has
/// already matched, or `exhausted_choice` if no branch's prefix matches and
/// at least one is still outstanding.
pub struct Combination3<A, B, C> {
    pub a: A,
    pub b: B,
    pub c: C,
}

pub fn combination3<A, B, C>(a: A, b: B, c: C) -> Combination3<A, B, C> {
    Combination3 { a, b, c }
}

/// Shared round-robin driver for both [`Combination3`] and
/// [`PartialCombination3`]: repeatedly tries every not-yet-matched branch in
/// order, filling in the first that matches each round, until either every
/// branch has matched or a round matches nothing.
fn run_combination3<E, H, A, B, C>(
    a_rule: &A,
    b_rule: &B,
    c_rule: &C,
    ctx: &mut Context<'_, H, E>,
    reader: &mut Reader<'_, E>,
) -> Result<(Option<A::Output>, Option<B::Output>, Option<C::Output>, bool), Failed>
where
    E: Encoding,
    H: Handler,
    A: BranchRule<E>,
    B: BranchRule<E>,
    C: BranchRule<E>,
{
    let mut a = None;
    let mut b = None;
    let mut c = None;
    let mut committed = false;

    loop {
        if a.is_some() && b.is_some() && c.is_some() {
            return Ok((a, b, c, committed));
        }

        let mut matched_this_round = false;

        if a.is_none() {
            match a_rule.try_parse(ctx, reader) {
                Branch::Taken(v) => {
                    a = Some(v);
                    matched_this_round = true;
                    committed = true;
                }
                Branch::Failed => return Err(Failed),
                Branch::Backtracked => {}
            }
        }
        if !matched_this_round && b.is_none() {
            match b_rule.try_parse(ctx, reader) {
                Branch::Taken(v) => {
                    b = Some(v);
                    matched_this_round = true;
                    committed = true;
                }
                Branch::Failed => return Err(Failed),
                Branch::Backtracked => {}
            }
        }
        if !matched_this_round && c.is_none() {
            match c_rule.try_parse(ctx, reader) {
                Branch::Taken(v) => {
                    c = Some(v);
                    matched_this_round = true;
                    committed = true;
                }
                Branch::Failed => return Err(Failed),
                Branch::Backtracked => {}
            }
        }

        if !matched_this_round {
            return Ok((a, b, c, committed));
        }
    }
}

impl<E, A, B, C> Rule<E> for Combination3<A, B, C>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E>,
    C: BranchRule<E>,
{
    type Output = (A::Output, B::Output, C::Output);
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(v) => Ok(v),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::ExhaustedChoice, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E, A, B, C> BranchRule<E> for Combination3<A, B, C>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E>,
    C: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let (a, b, c, committed) = match run_combination3(&self.a, &self.b, &self.c, ctx, reader) {
            Ok(v) => v,
            Err(Failed) => return Branch::Failed,
        };
        match (a, b, c) {
            (Some(a), Some(b), Some(c)) => Branch::Taken((a, b, c)),
            (a, b, c) if !committed => {
                debug_assert!(a.is_none() && b.is_none() && c.is_none());
                Branch::Backtracked
            }
            _ => {
                let entry = *reader;
                let is_duplicate = {
                    let mut dup = false;
                    *reader = entry;
                    dup |= matches!(self.a.try_parse(ctx, reader), Branch::Taken(_));
                    *reader = entry;
                    dup |= matches!(self.b.try_parse(ctx, reader), Branch::Taken(_));
                    *reader = entry;
                    dup |= matches!(self.c.try_parse(ctx, reader), Branch::Taken(_));
                    dup
                };
                *reader = entry;
                let pos = reader.position();
                let kind = if is_duplicate { ErrorKind::CombinationDuplicate } else { ErrorKind::ExhaustedChoice };
                ctx.emit_error(ParseError::new(kind, Span { offset: pos.0, len: 0 }));
                Branch::Failed
            }
        }
    }
}

/// Like [`Combination3`], but never requires every branch to match: it stops
/// as soon as no outstanding branch's prefix applies and returns whatever was
/// collected. Always succeeds, even matching nothing.
pub struct PartialCombination3<A, B, C> {
    pub a: A,
    pub b: B,
    pub c: C,
}

pub fn partial_combination3<A, B, C>(a: A, b: B, c: C) -> PartialCombination3<A, B, C> {
    PartialCombination3 { a, b, c }
}

impl<E, A, B, C> Rule<E> for PartialCombination3<A, B, C>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E>,
    C: BranchRule<E>,
{
    type Output = (Option<A::Output>, Option<B::Output>, Option<C::Output>);
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let (a, b, c, _) = run_combination3(&self.a, &self.b, &self.c, ctx, reader)?;
        Ok((a, b, c))
    }
}

impl<E, A, B, C> BranchRule<E> for PartialCombination3<A, B, C>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E>,
    C: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match Rule::parse(self, ctx, reader) {
            Ok(v) => Branch::Taken(v),
            Err(_) => Branch::Failed,
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

    fn run<R: Rule<Byte>>(rule: &R, input: &[u8]) -> (ParseResult<R::Output>, usize) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let result = rule.parse(&mut ctx, &mut reader);
        (result, validate.errors().len())
    }

    #[test]
    fn matches_any_order() {
        let rule = combination3(lit("a"), lit("b"), lit("c"));
        assert!(run(&rule, b"cab").0.is_ok());
        assert!(run(&rule, b"abc").0.is_ok());
    }

    #[test]
    fn missing_branch_is_exhausted_choice() {
        let rule = combination3(lit("a"), lit("b"), lit("c"));
        let (result, errors) = run(&rule, b"ab");
        assert!(result.is_err());
        assert_eq!(errors, 1);
    }

    #[test]
    fn repeated_branch_is_a_duplicate() {
        let rule = combination3(lit("a"), lit("b"), lit("c"));
        let (result, _) = run(&rule, b"aab");
        assert!(result.is_err());
    }

    #[test]
    fn partial_combination_accepts_a_subset() {
        let rule = partial_combination3(lit("a"), lit("b"), lit("c"));
        let (result, errors) = run(&rule, b"b");
        let (a, b, c) = result.expect("never fails");
        assert!(a.is_none());
        assert!(b.is_some());
        assert!(c.is_none());
        assert_eq!(errors, 0);
    }
}
