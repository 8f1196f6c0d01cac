//! `Seq` (`A + B + ...`): runs each child in turn, keeping every
//! child's value as a flat tuple. The first child is probed via
//! [`BranchRule::try_parse`] when it implements one (so a `Seq` nested inside
//! a `Choice` backtracks cleanly); every subsequent child is driven with an
//! ordinary, committed `parse` — once the first child's characteristic
//! prefix has matched, the whole sequence is committed.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, ParseResult, Rule};
use crate::handler::Handler;
use crate::reader::Reader;

/// Two rules in sequence, `(A::Output, B::Output)`.
pub struct Seq2<A, B>(pub A, pub B);

impl<E: Encoding, A: Rule<E>, B: Rule<E>> Rule<E> for Seq2<A, B> {
    type Output = (A::Output, B::Output);
    const IS_BRANCH: bool = A::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let a = self.0.parse(ctx, reader)?;
        let b = self.1.parse(ctx, reader)?;
        Ok((a, b))
    }
}

impl<E: Encoding, A: BranchRule<E>, B: Rule<E>> BranchRule<E> for Seq2<A, B> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(a) => match self.1.parse(ctx, reader) {
                Ok(b) => Branch::Taken((a, b)),
                Err(_) => Branch::Failed,
            },
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

// Arities above 2 are spelled out by hand rather than generated by a macro:
// flattening the "first field vs. the rest" split across arities needs a
// helper trait, which would be more machinery than the handful of fixed
// arities a grammar actually reaches for in practice.

pub struct Seq3<A, B, C>(pub A, pub B, pub C);

impl<E: Encoding, A: Rule<E>, B: Rule<E>, C: Rule<E>> Rule<E> for Seq3<A, B, C> {
    type Output = (A::Output, B::Output, C::Output);
    const IS_BRANCH: bool = A::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let a = self.0.parse(ctx, reader)?;
        let b = self.1.parse(ctx, reader)?;
        let c = self.2.parse(ctx, reader)?;
        Ok((a, b, c))
    }
}

impl<E: Encoding, A: BranchRule<E>, B: Rule<E>, C: Rule<E>> BranchRule<E> for Seq3<A, B, C> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(a) => {
                let rest = (|| -> ParseResult<_> { Ok((self.1.parse(ctx, reader)?, self.2.parse(ctx, reader)?)) })();
                match rest {
                    Ok((b, c)) => Branch::Taken((a, b, c)),
                    Err(_) => Branch::Failed,
                }
            }
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

pub struct Seq4<A, B, C, D>(pub A, pub B, pub C, pub D);

impl<E: Encoding, A: Rule<E>, B: Rule<E>, C: Rule<E>, D: Rule<E>> Rule<E> for Seq4<A, B, C, D> {
    type Output = (A::Output, B::Output, C::Output, D::Output);
    const IS_BRANCH: bool = A::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let a = self.0.parse(ctx, reader)?;
        let b = self.1.parse(ctx, reader)?;
        let c = self.2.parse(ctx, reader)?;
        let d = self.3.parse(ctx, reader)?;
        Ok((a, b, c, d))
    }
}

impl<E: Encoding, A: BranchRule<E>, B: Rule<E>, C: Rule<E>, D: Rule<E>> BranchRule<E> for Seq4<A, B, C, D> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(a) => {
                let rest = (|| -> ParseResult<_> {
                    Ok((self.1.parse(ctx, reader)?, self.2.parse(ctx, reader)?, self.3.parse(ctx, reader)?))
                })();
                match rest {
                    Ok((b, c, d)) => Branch::Taken((a, b, c, d)),
                    Err(_) => Branch::Failed,
                }
            }
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

/// `A >> B` ("Then"): like [`Seq2`] but keeps only `B`'s value,
/// discarding `A`'s — for the common "skip a separator, keep what follows"
/// shape.
pub struct Then<A, B>(pub A, pub B);

impl<E: Encoding, A: Rule<E>, B: Rule<E>> Rule<E> for Then<A, B> {
    type Output = B::Output;
    const IS_BRANCH: bool = A::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        self.0.parse(ctx, reader)?;
        self.1.parse(ctx, reader)
    }
}

impl<E: Encoding, A: BranchRule<E>, B: Rule<E>> BranchRule<E> for Then<A, B> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(_) => match self.1.parse(ctx, reader) {
                Ok(b) => Branch::Taken(b),
                Err(_) => Branch::Failed,
            },
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

    #[test]
    fn seq2_combines_both_values() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"ab");
        let rule = Seq2(lit("a"), lit("b"));
        let (a, b) = Rule::parse(&rule, &mut ctx, &mut reader).expect("matches");
        assert_eq!(a.len, 1);
        assert_eq!(b.len, 1);
    }

    #[test]
    fn then_discards_the_left_value() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"ab");
        let rule = Then(lit("a"), lit("b"));
        let b = Rule::parse(&rule, &mut ctx, &mut reader).expect("matches");
        assert_eq!(b.len, 1);
        assert_eq!(reader.position().0, 2);
    }
}
