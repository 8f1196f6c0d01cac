//! `switch_(R)`: runs a selector rule `R` that produces a matched
//! [`Span`], then dispatches on the exact text it covers to a per-case value
//! constructor — the common "peek at an already-lexed word, decide what it
//! means" shape (keyword-directed statement dispatch, unit suffix lookup).
//!
//! Cases carry a plain `Fn(Span) -> Out` rather than a further sub-rule: the
//! selector already consumed the input by the time a case runs, so a case
//! only ever needs to turn the matched span into a value, never parse more.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct Switch<Sel, Out> {
    selector: Sel,
    cases: Vec<(&'static str, Box<dyn Fn(Span) -> Out>)>,
}

pub fn switch_<Sel, Out>(selector: Sel) -> Switch<Sel, Out> {
    Switch { selector, cases: Vec::new() }
}

impl<Sel, Out> Switch<Sel, Out> {
    /// Adds a case: if the selector's matched text equals `tag` exactly, `f`
    /// builds the result. Cases are tried in the order they were added; the
    /// first match wins, the same "ties broken by declaration order"
    /// convention used elsewhere in the combinator set (literal sets, choice).
    pub fn case(mut self, tag: &'static str, f: impl Fn(Span) -> Out + 'static) -> Self {
        self.cases.push((tag, Box::new(f)));
        self
    }
}

impl<E, Sel, Out> Rule<E> for Switch<Sel, Out>
where
    E: Encoding,
    Sel: Rule<E, Output = Span>,
{
    type Output = Out;
    const IS_BRANCH: bool = Sel::IS_BRANCH;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let span = self.selector.parse(ctx, reader)?;
        let text = reader.slice(span);
        for (tag, build) in &self.cases {
            if tag.as_bytes() == text {
                return Ok(build(span));
            }
        }
        ctx.emit_error(ParseError::new(ErrorKind::ExhaustedSwitch, span));
        Err(Failed)
    }
}

impl<E, Sel, Out> BranchRule<E> for Switch<Sel, Out>
where
    E: Encoding,
    Sel: BranchRule<E, Output = Span>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let span = match self.selector.try_parse(ctx, reader) {
            Branch::Taken(span) => span,
            Branch::Backtracked => return Branch::Backtracked,
            Branch::Failed => return Branch::Failed,
        };
        let text = reader.slice(span);
        for (tag, build) in &self.cases {
            if tag.as_bytes() == text {
                return Branch::Taken(build(span));
            }
        }
        ctx.emit_error(ParseError::new(ErrorKind::ExhaustedSwitch, span));
        Branch::Failed
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::combinators::capture::capture;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::tokens::Class;
    use crate::charclass::Alpha;

    fn selector() -> impl Rule<Byte, Output = Span> {
        capture(Class::new(Alpha))
    }

    #[test]
    fn dispatches_on_matched_text() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"a");
        let rule = switch_(selector()).case("a", |_| 1).case("b", |_| 2);
        assert_eq!(Rule::parse(&rule, &mut ctx, &mut reader).unwrap(), 1);
    }

    #[test]
    fn unmatched_case_reports_exhausted_switch() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"c");
        let rule = switch_(selector()).case("a", |_| 1).case("b", |_| 2);
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_err());
        assert_eq!(validate.errors().len(), 1);
        assert!(matches!(validate.errors()[0].kind, crate::error::ErrorKind::ExhaustedSwitch));
    }
}
