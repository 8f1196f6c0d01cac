//! `opt`: probes a branch rule,
//! yielding `Some(value)` when it's taken and `None` when it backtracks.
//! Never fails — this is the combinator that turns "not matched" from a
//! failure into a value.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::handler::Handler;
use crate::reader::Reader;

pub struct Opt<R>(pub R);

pub fn opt<R>(rule: R) -> Opt<R> {
    Opt(rule)
}

impl<E: Encoding, R: BranchRule<E>> Rule<E> for Opt<R> {
    type Output = Option<R::Output>;
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(v) => Ok(Some(v)),
            Branch::Backtracked => Ok(None),
            Branch::Failed => Err(Failed),
        }
    }
}

impl<E: Encoding, R: BranchRule<E>> BranchRule<E> for Opt<R> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(v) => Branch::Taken(Some(v)),
            Branch::Backtracked => Branch::Taken(None),
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
    fn yields_none_without_consuming_on_backtrack() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"xyz");
        let rule = opt(lit("abc"));
        let result = Rule::parse(&rule, &mut ctx, &mut reader).expect("opt never fails");
        assert!(result.is_none());
        assert_eq!(reader.position().0, 0);
    }

    #[test]
    fn yields_some_on_match() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"abc");
        let rule = opt(lit("abc"));
        let result = Rule::parse(&rule, &mut ctx, &mut reader).expect("opt never fails");
        assert!(result.is_some());
    }
}
