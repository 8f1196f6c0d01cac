//! `brackets(open, close)(inner)`: `open >> inner + close`, reporting
//! `missing_delimiter` rather than `exhausted_choice` when `close` never
//! shows up — the one place a plain `Then`+`Seq2` composition wouldn't give
//! the right error tag.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

/// Partially applied `brackets(open, close)`; call [`Brackets::around`] with
/// the body rule to get a usable [`Rule`].
pub struct Brackets<O, C> {
    open: O,
    close: C,
}

pub fn brackets<O, C>(open: O, close: C) -> Brackets<O, C> {
    Brackets { open, close }
}

impl<O, C> Brackets<O, C> {
    pub fn around<Inner>(self, inner: Inner) -> BracketedRule<O, C, Inner> {
        BracketedRule { open: self.open, close: self.close, inner }
    }
}

pub struct BracketedRule<O, C, Inner> {
    open: O,
    close: C,
    inner: Inner,
}

impl<E, O, C, Inner> Rule<E> for BracketedRule<O, C, Inner>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Inner: Rule<E>,
{
    type Output = Inner::Output;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(v) => Ok(v),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::Unexpected { found: crate::token::TokenKind::UNKNOWN, expected: "an opening delimiter" },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E, O, C, Inner> BranchRule<E> for BracketedRule<O, C, Inner>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Inner: Rule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let open_pos = reader.position();
        match self.open.try_parse(ctx, reader) {
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
            Branch::Taken(_) => match self.inner.parse(ctx, reader) {
                Err(_) => Branch::Failed,
                Ok(value) => match self.close.try_parse(ctx, reader) {
                    Branch::Taken(_) => Branch::Taken(value),
                    Branch::Backtracked | Branch::Failed => {
                        let pos = reader.position();
                        ctx.emit_error(ParseError::new(
                            ErrorKind::MissingDelimiter,
                            Span { offset: open_pos.0, len: pos.0 - open_pos.0 },
                        ));
                        Branch::Failed
                    }
                },
            },
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

    fn run(input: &[u8]) -> (ParseResult<Span>, Validate) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let rule = brackets(lit("("), lit(")")).around(lit("x"));
        let result = Rule::parse(&rule, &mut ctx, &mut reader);
        (result, validate)
    }

    #[test]
    fn matches_a_bracketed_body() {
        let (result, validate) = run(b"(x)");
        assert!(result.is_ok());
        assert!(validate.errors().is_empty());
    }

    #[test]
    fn missing_close_is_reported_as_a_missing_delimiter() {
        let (result, validate) = run(b"(x");
        assert!(result.is_err());
        assert_eq!(validate.errors().len(), 1);
        assert!(matches!(validate.errors()[0].kind, crate::error::ErrorKind::MissingDelimiter));
    }

    #[test]
    fn missing_open_is_not_a_missing_delimiter_error() {
        let (result, validate) = run(b"x)");
        assert!(result.is_err());
        assert!(!matches!(validate.errors()[0].kind, crate::error::ErrorKind::MissingDelimiter));
    }
}
