//! `error<Tag>[(R)]`: unconditionally emits a
//! user tag as an error and succeeds — a grammar point that is always
//! reachable (e.g. the fallback arm of a `switch_`/`choice` chain) but
//! always wrong. `.spanning(probe)` widens the reported span to whatever
//! `probe` would additionally consume, without making success depend on
//! `probe` matching.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ErrorTag, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct ErrorRule<Tag> {
    tag: Tag,
}

pub fn error_<Tag: ErrorTag + Clone>(tag: Tag) -> ErrorRule<Tag> {
    ErrorRule { tag }
}

impl<Tag: ErrorTag + Clone> ErrorRule<Tag> {
    /// Extends this error to cover whatever `probe` would consume: `probe` is
    /// run for its span only (via `try_parse` when it backtracks), never
    /// treated as a condition for success.
    pub fn spanning<R>(self, probe: R) -> ErrorRuleSpanning<Tag, R> {
        ErrorRuleSpanning { tag: self.tag, probe }
    }
}

impl<E, Tag> Rule<E> for ErrorRule<Tag>
where
    E: Encoding,
    Tag: ErrorTag + Clone,
{
    type Output = ();
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let pos = reader.position();
        ctx.emit_error(ParseError::new(ErrorKind::Custom(Box::new(self.tag.clone())), Span { offset: pos.0, len: 0 }));
        Ok(())
    }
}

impl<E, Tag> BranchRule<E> for ErrorRule<Tag>
where
    E: Encoding,
    Tag: ErrorTag + Clone,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match Rule::parse(self, ctx, reader) {
            Ok(()) => Branch::Taken(()),
            Err(Failed) => Branch::Failed,
        }
    }
}

pub struct ErrorRuleSpanning<Tag, R> {
    tag: Tag,
    probe: R,
}

impl<E, Tag, R> Rule<E> for ErrorRuleSpanning<Tag, R>
where
    E: Encoding,
    Tag: ErrorTag + Clone,
    R: BranchRule<E>,
{
    type Output = ();
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let start = reader.position();
        if let Branch::Failed = self.probe.try_parse(ctx, reader) {
            return Err(Failed);
        }
        let span = reader.span_since(start);
        ctx.emit_error(ParseError::new(ErrorKind::Custom(Box::new(self.tag.clone())), span));
        Ok(())
    }
}

impl<E, Tag, R> BranchRule<E> for ErrorRuleSpanning<Tag, R>
where
    E: Encoding,
    Tag: ErrorTag + Clone,
    R: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match Rule::parse(self, ctx, reader) {
            Ok(()) => Branch::Taken(()),
            Err(Failed) => Branch::Failed,
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
    use std::fmt;

    #[derive(Clone, Debug)]
    struct Unsupported(&'static str);

    impl fmt::Display for Unsupported {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "unsupported construct: {}", self.0)
        }
    }

    #[test]
    fn always_succeeds_and_reports_a_zero_length_span() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"x");
        let rule = error_(Unsupported("old syntax"));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(validate.errors().len(), 1);
        assert_eq!(reader.position().0, 0);
    }

    #[test]
    fn spanning_widens_the_reported_range() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"old");
        let rule = error_(Unsupported("old syntax")).spanning(lit("old"));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(validate.errors()[0].span.len, 3);
        assert_eq!(reader.position().0, 3);
    }
}
