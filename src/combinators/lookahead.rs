//! `lookahead(needle, end)`: searches forward, without consuming, for
//! `needle` before `end` matches or EOF is reached. Shares `tokens::Until`'s
//! "advance one code unit and retry" search loop, but never consumes and
//! reports a dedicated failure tag instead of a generic backtrack.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct Lookahead<Needle, End> {
    needle: Needle,
    end: End,
}

pub fn lookahead<Needle, End>(needle: Needle, end: End) -> Lookahead<Needle, End> {
    Lookahead { needle, end }
}

impl<E, Needle, End> Rule<E> for Lookahead<Needle, End>
where
    E: Encoding,
    Needle: BranchRule<E>,
    End: BranchRule<E>,
{
    type Output = ();
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(()) => Ok(()),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::LookaheadFailure, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E, Needle, End> BranchRule<E> for Lookahead<Needle, End>
where
    E: Encoding,
    Needle: BranchRule<E>,
    End: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        loop {
            let probe = *reader;
            match self.end.try_parse(ctx, reader) {
                Branch::Taken(_) => {
                    *reader = entry;
                    return Branch::Backtracked;
                }
                Branch::Failed => {
                    *reader = entry;
                    return Branch::Failed;
                }
                Branch::Backtracked => *reader = probe,
            }

            let probe = *reader;
            match self.needle.try_parse(ctx, reader) {
                Branch::Taken(_) => {
                    *reader = entry;
                    return Branch::Taken(());
                }
                Branch::Failed => {
                    *reader = entry;
                    return Branch::Failed;
                }
                Branch::Backtracked => *reader = probe,
            }

            if reader.peek().is_none() {
                *reader = entry;
                return Branch::Backtracked;
            }
            reader.bump();
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

    fn run(input: &[u8]) -> ParseResult<()> {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let rule = lookahead(lit(";"), lit("}"));
        Rule::parse(&rule, &mut ctx, &mut reader)
    }

    #[test]
    fn finds_needle_before_end() {
        assert!(run(b"x y z;}").is_ok());
    }

    #[test]
    fn end_before_needle_fails() {
        assert!(run(b"x y }").is_err());
    }

    #[test]
    fn does_not_consume_on_success() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"ab;");
        let rule = lookahead(lit(";"), lit("}"));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_ok());
        assert_eq!(reader.position().0, 0);
    }
}
