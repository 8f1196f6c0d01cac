//! `capture(R)`: parses `R` for its side effects and produces
//! the [`Span`] it consumed, excluding any trailing implicit whitespace that
//! got skipped after `R`'s last token.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, ParseResult, Rule};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::{Pos, Span};

pub struct Capture<R>(pub R);

pub fn capture<R>(rule: R) -> Capture<R> {
    Capture(rule)
}

/// `reader`'s current position already reflects any trailing whitespace `R`
/// caused to be skipped; `ctx.last_token_end()` is the position right before
/// that skip. Falls back to `reader.position()` if nothing was consumed, or
/// if the recorded end looks stale (no token was emitted inside `R` at all).
fn captured_span<H: Handler, E: Encoding>(ctx: &Context<'_, H, E>, reader: &Reader<'_, E>, start: Pos) -> Span {
    let now = reader.position();
    if now == start {
        return Span::new(start, start);
    }
    let recorded = ctx.last_token_end();
    let end = if recorded.0 >= start.0 && recorded.0 <= now.0 { recorded } else { now };
    Span::new(start, end)
}

impl<E: Encoding, R: Rule<E>> Rule<E> for Capture<R> {
    type Output = Span;
    const IS_BRANCH: bool = R::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let start = reader.position();
        self.0.parse(ctx, reader)?;
        Ok(captured_span(ctx, reader, start))
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for Capture<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let start = reader.position();
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(_) => Branch::Taken(captured_span(ctx, reader, start)),
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::charclass::Space;
    use crate::combinators::seq::Seq2;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::engine::Failed;
    use crate::tokens::{lit, Class};

    #[test]
    fn captures_exactly_what_the_inner_rule_consumed() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"ab");
        let rule = capture(Seq2(lit("a"), lit("b")));
        let span = Rule::parse(&rule, &mut ctx, &mut reader).expect("matches");
        assert_eq!((span.offset, span.len), (0, 2));
    }

    /// A whitespace rule with the `Output = ()` shape `Production::whitespace`
    /// requires, standing in for a real grammar's `while_(ascii::space())`
    /// mapped down to unit.
    struct Spaces;

    impl Rule<Byte> for Spaces {
        type Output = ();
        const IS_BRANCH: bool = true;

        fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, Byte>, reader: &mut Reader<'_, Byte>) -> ParseResult<()> {
            Class::new(Space).parse(ctx, reader).map(|_| ()).map_err(|_: Failed| Failed)
        }
    }

    #[test]
    fn excludes_trailing_whitespace_skipped_after_the_last_token() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut scoped = ctx.enter_whitespace_scope(Some(crate::context::erase_whitespace(Spaces)), false);
        let mut reader = Reader::<Byte>::new(b"ab   ");
        let rule = capture(Seq2(lit("a"), lit("b")));
        let span = Rule::parse(&rule, &mut scoped, &mut reader).expect("matches");
        assert_eq!((span.offset, span.len), (0, 2));
        assert_eq!(reader.position().0, 5);
    }
}
