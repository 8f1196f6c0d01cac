//! `Choice`/`Alt` (`A | B`): tries alternatives in order, committing to
//! the first whose characteristic prefix matches. `N`-ary choices nest as
//! `Choice<Choice<A, B>, C>`; since every level shares the same `Output`
//! type, nesting needs no flattening the way [`super::seq`] does.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct Choice<A, B>(pub A, pub B);

impl<E, A, B> Rule<E> for Choice<A, B>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E, Output = A::Output>,
{
    type Output = A::Output;
    const IS_BRANCH: bool = true;

    /// Only a bare, top-level `Choice` reaches here (a `Choice` nested inside
    /// another combinator is driven through `try_parse` instead) — so this is
    /// the right place to turn an exhausted choice into a reported error —
    /// emitting `exhausted_choice` for the `Backtracked` case is the
    /// caller's job.
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

impl<E, A, B> BranchRule<E> for Choice<A, B>
where
    E: Encoding,
    A: BranchRule<E>,
    B: BranchRule<E, Output = A::Output>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(v) => Branch::Taken(v),
            Branch::Failed => Branch::Failed,
            Branch::Backtracked => self.1.try_parse(ctx, reader),
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

    fn run(input: &[u8]) -> (ParseResult<Span>, usize) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let rule = Choice(lit("foo"), lit("bar"));
        let result = Rule::parse(&rule, &mut ctx, &mut reader);
        (result, validate.errors().len())
    }

    #[test]
    fn first_alternative_matches() {
        let (result, errors) = run(b"foo");
        assert!(result.is_ok());
        assert_eq!(errors, 0);
    }

    #[test]
    fn second_alternative_matches_after_first_backtracks() {
        let (result, errors) = run(b"bar");
        assert!(result.is_ok());
        assert_eq!(errors, 0);
    }

    #[test]
    fn exhausted_choice_reports_an_error() {
        let (result, errors) = run(b"baz");
        assert!(result.is_err());
        assert_eq!(errors, 1);
    }
}
