//! `delimited(open, close)(chr[, esc])`: `open`,
//! followed by a repetition of `chr` (or `esc | chr` when an escape rule is
//! supplied) up to `close`, reporting `missing_delimiter` — the same tag
//! `brackets` uses — rather than a generic failure when `close` never shows
//! up.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

/// Partially applied `delimited(open, close)`. Call [`DelimitedBuilder::body`]
/// or [`DelimitedBuilder::body_with_escape`] to get a usable [`Rule`].
pub struct DelimitedBuilder<O, C> {
    open: O,
    close: C,
}

pub fn delimited<O, C>(open: O, close: C) -> DelimitedBuilder<O, C> {
    DelimitedBuilder { open, close }
}

impl<O, C> DelimitedBuilder<O, C> {
    pub fn body<Chr>(self, chr: Chr) -> Delimited<O, C, Chr> {
        Delimited { open: self.open, close: self.close, chr }
    }

    pub fn body_with_escape<Chr, Esc>(self, chr: Chr, esc: Esc) -> DelimitedEscaped<O, C, Chr, Esc> {
        DelimitedEscaped { open: self.open, close: self.close, chr, esc }
    }
}

pub struct Delimited<O, C, Chr> {
    open: O,
    close: C,
    chr: Chr,
}

impl<E, O, C, Chr> Rule<E> for Delimited<O, C, Chr>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Chr: BranchRule<E>,
{
    type Output = Vec<Chr::Output>;
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

impl<E, O, C, Chr> BranchRule<E> for Delimited<O, C, Chr>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Chr: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let open_pos = reader.position();
        match self.open.try_parse(ctx, reader) {
            Branch::Backtracked => return Branch::Backtracked,
            Branch::Failed => return Branch::Failed,
            Branch::Taken(_) => {}
        }

        let mut items = Vec::new();
        loop {
            match self.close.try_parse(ctx, reader) {
                Branch::Taken(_) => return Branch::Taken(items),
                Branch::Failed => return Branch::Failed,
                Branch::Backtracked => {}
            }
            if reader.peek().is_none() {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::MissingDelimiter, Span { offset: open_pos.0, len: pos.0 - open_pos.0 }));
                return Branch::Failed;
            }
            match self.chr.try_parse(ctx, reader) {
                Branch::Taken(v) => items.push(v),
                Branch::Failed => return Branch::Failed,
                Branch::Backtracked => {
                    let pos = reader.position();
                    ctx.emit_error(ParseError::new(ErrorKind::MissingDelimiter, Span { offset: open_pos.0, len: pos.0 - open_pos.0 }));
                    return Branch::Failed;
                }
            }
        }
    }
}

pub struct DelimitedEscaped<O, C, Chr, Esc> {
    open: O,
    close: C,
    chr: Chr,
    esc: Esc,
}

impl<E, O, C, Chr, Esc> Rule<E> for DelimitedEscaped<O, C, Chr, Esc>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Chr: BranchRule<E>,
    Esc: BranchRule<E, Output = Chr::Output>,
{
    type Output = Vec<Chr::Output>;
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

impl<E, O, C, Chr, Esc> BranchRule<E> for DelimitedEscaped<O, C, Chr, Esc>
where
    E: Encoding,
    O: BranchRule<E>,
    C: BranchRule<E>,
    Chr: BranchRule<E>,
    Esc: BranchRule<E, Output = Chr::Output>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let open_pos = reader.position();
        match self.open.try_parse(ctx, reader) {
            Branch::Backtracked => return Branch::Backtracked,
            Branch::Failed => return Branch::Failed,
            Branch::Taken(_) => {}
        }

        let mut items = Vec::new();
        loop {
            match self.close.try_parse(ctx, reader) {
                Branch::Taken(_) => return Branch::Taken(items),
                Branch::Failed => return Branch::Failed,
                Branch::Backtracked => {}
            }
            if reader.peek().is_none() {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::MissingDelimiter, Span { offset: open_pos.0, len: pos.0 - open_pos.0 }));
                return Branch::Failed;
            }
            match self.esc.try_parse(ctx, reader) {
                Branch::Taken(v) => {
                    items.push(v);
                    continue;
                }
                Branch::Failed => return Branch::Failed,
                Branch::Backtracked => {}
            }
            match self.chr.try_parse(ctx, reader) {
                Branch::Taken(v) => items.push(v),
                Branch::Failed => return Branch::Failed,
                Branch::Backtracked => {
                    let pos = reader.position();
                    ctx.emit_error(ParseError::new(ErrorKind::MissingDelimiter, Span { offset: open_pos.0, len: pos.0 - open_pos.0 }));
                    return Branch::Failed;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::charclass::{Alnum, ByteClassExt};
    use crate::combinators::seq::Then;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::tokens::{lit, Class};

    fn quote_body() -> impl BranchRule<Byte, Output = Span> {
        Class::new(Alnum.or(crate::charclass::Space))
    }

    #[test]
    fn matches_a_quoted_body() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"\"hi there\"");
        let rule = delimited(lit("\""), lit("\"")).body(quote_body());
        let result = Rule::parse(&rule, &mut ctx, &mut reader);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 8);
    }

    #[test]
    fn missing_close_is_a_missing_delimiter() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"\"hi");
        let rule = delimited(lit("\""), lit("\"")).body(quote_body());
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_err());
        assert!(matches!(validate.errors()[0].kind, crate::error::ErrorKind::MissingDelimiter));
    }

    #[test]
    fn escape_consumes_the_escaped_quote() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"\"a\\\"b\"");
        let escape = Then(lit("\\"), lit("\""));
        let rule = delimited(lit("\""), lit("\"")).body_with_escape(quote_body(), escape);
        let result = Rule::parse(&rule, &mut ctx, &mut reader);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 3);
    }
}
