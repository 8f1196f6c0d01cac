//! `recurse::<P>()`: references a production from within
//! another production's grammar before its own type is fully assembled,
//! breaking the infinite monomorphization a direct `P::rule()` embedding
//! would require for a self-referential grammar.
//!
//! Always reports `IS_BRANCH == false`: a recursive alternative doesn't need
//! to try to prove branch-ness of a rule still being defined — a grammar
//! that wants `recurse::<P>()` as one arm of a `choice` has to wrap it (e.g.
//! behind a `peek` of whatever prefix distinguishes that arm) rather than
//! relying on `Choice`'s branch-probing.

use std::marker::PhantomData;

use crate::context::Context;
use crate::engine::{ParseResult, Rule};
use crate::handler::Handler;
use crate::production::{drive_production_inline, Production};
use crate::reader::Reader;

pub struct Recurse<P>(PhantomData<fn() -> P>);

impl<P> Clone for Recurse<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Recurse<P> {}

/// References `P` recursively from within another production's grammar.
pub fn recurse<P: Production>() -> Recurse<P> {
    Recurse(PhantomData)
}

impl<P: Production> Rule<P::Encoding> for Recurse<P> {
    type Output = P::Output;
    const IS_BRANCH: bool = false;

    fn parse<H: Handler>(
        &self,
        ctx: &mut Context<'_, H, P::Encoding>,
        reader: &mut Reader<'_, P::Encoding>,
    ) -> ParseResult<Self::Output> {
        drive_production_inline::<P, H>(ctx, reader)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::combinators::seq::Then;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::span::Span;
    use crate::tokens::lit;

    /// A production recursed into from another one, to confirm `recurse`
    /// actually drives it end to end (its own `production_start`/`finish`
    /// included) rather than just inlining its rule once.
    struct Greeting;

    impl Production for Greeting {
        type Encoding = Byte;
        type RuleArgs = Span;
        type Output = usize;
        const NAME: &'static str = "greeting";
        type RuleType = crate::tokens::Lit;

        fn rule() -> Self::RuleType {
            lit("hi")
        }

        fn value(span: Self::RuleArgs) -> Self::Output {
            span.len as usize
        }
    }

    struct Wrapper;

    impl Production for Wrapper {
        type Encoding = Byte;
        type RuleArgs = usize;
        type Output = usize;
        const NAME: &'static str = "wrapper";
        type RuleType = Then<crate::tokens::Lit, Recurse<Greeting>>;

        fn rule() -> Self::RuleType {
            Then(lit(">"), recurse::<Greeting>())
        }

        fn value(inner: Self::RuleArgs) -> Self::Output {
            inner
        }
    }

    #[test]
    fn recurse_drives_the_nested_production() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b">hi");
        let value = crate::production::drive_production_inline::<Wrapper, Validate>(&mut ctx, &mut reader)
            .expect("wrapper and its recursed-into greeting both match");
        assert_eq!(value, 2);
        assert!(reader.is_eof());
    }
}
