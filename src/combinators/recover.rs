//! `try_(rule, limit, fallback)`: parses `rule`; on failure, skips input
//! one code unit at a time until `limit`'s branch-probe matches or EOF is
//! reached, then returns `fallback()` as a successful result instead of
//! propagating the failure.
//!
//! `rule`'s own error has already been emitted through the ordinary engine
//! protocol by the time `Try::parse` sees `Err(Failed)` — this combinator
//! only adds the `recovery_start`/`recovery_finish`/`recovery_cancel`
//! bracket around the skip itself. Grounded on the "discard tokens until a
//! synchronizing token or EOF" shape of recursive-descent error recovery
//! (e.g. a hand-written `synchronize()` that re-scans until a statement
//! boundary or end of input); ported here as a generic combinator that
//! takes its synchronizing rule as a parameter rather than hard-coding one
//! token kind, since the core has no fixed statement grammar to
//! synchronize on.
//!
//! An empty/never-matching `limit` that runs off the end of input is
//! treated as a *successful* recovery terminated by EOF, not a failure.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::handler::Handler;
use crate::reader::Reader;

pub struct Try<R, L, F> {
    rule: R,
    limit: L,
    fallback: F,
}

/// `rule` is attempted first; if it fails, input is discarded until `limit`
/// matches (or EOF), and `fallback()` becomes the recovered value.
pub fn try_<R, L, F, O>(rule: R, limit: L, fallback: F) -> Try<R, L, F>
where
    F: Fn() -> O,
{
    Try { rule, limit, fallback }
}

impl<E, R, L, F> Rule<E> for Try<R, L, F>
where
    E: Encoding,
    R: Rule<E>,
    L: BranchRule<E>,
    F: Fn() -> R::Output,
{
    type Output = R::Output;
    const IS_BRANCH: bool = false;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.rule.parse(ctx, reader) {
            Ok(value) => Ok(value),
            Err(Failed) => {
                let recovery_pos = reader.position();
                ctx.emit_recovery_start(recovery_pos);
                loop {
                    if reader.peek().is_none() {
                        break;
                    }
                    let probe = *reader;
                    match self.limit.try_parse(ctx, reader) {
                        Branch::Taken(_) => break,
                        Branch::Failed => {
                            ctx.emit_recovery_cancel(reader.position());
                            return Err(Failed);
                        }
                        Branch::Backtracked => {
                            *reader = probe;
                            reader.bump();
                        }
                    }
                }
                ctx.emit_recovery_finish(reader.position());
                Ok((self.fallback)())
            }
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

    fn run(input: &[u8]) -> (ParseResult<crate::span::Span>, Validate) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let rule = try_(lit("x"), lit(";"), crate::span::Span::default);
        let result = Rule::parse(&rule, &mut ctx, &mut reader);
        (result, validate)
    }

    #[test]
    fn recovers_to_the_limit_token() {
        let (result, validate) = run(b"garbage;");
        assert!(result.is_ok());
        assert_eq!(validate.errors().len(), 1);
    }

    #[test]
    fn recovers_to_eof_when_limit_never_matches() {
        let (result, _validate) = run(b"garbage without a terminator");
        assert!(result.is_ok());
    }

    #[test]
    fn succeeds_without_recovery_when_rule_matches() {
        let (result, validate) = run(b"x");
        assert!(result.is_ok());
        assert!(validate.errors().is_empty());
    }
}
