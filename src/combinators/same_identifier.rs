//! `same_identifier(id, rule)`: parses
//! `rule` (normally an `identifier()` call), then checks its matched text
//! against a lexeme captured earlier into the same parse's scope chain —
//! the shape a grammar needs for "closing tag must repeat the opening tag's
//! name" constructs. Reports `different_identifier` on a mismatch rather
//! than backtracking: the identifier itself already matched, so by the
//! commit-once-taken rule this is a real error, not a missed alternative.

use crate::context::{Context, ScopeId, ScopedValue};
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;

pub struct SameIdentifier<R> {
    id: ScopeId,
    rule: R,
}

/// `id` must have been bound earlier in the same parse (typically via
/// `ctx.push_scope(id, ScopedValue::Lexeme(captured_span))`) to a
/// [`ScopedValue::Lexeme`].
pub fn same_identifier<R>(id: ScopeId, rule: R) -> SameIdentifier<R> {
    SameIdentifier { id, rule }
}

fn expected_span<H: Handler, E: Encoding>(ctx: &Context<'_, H, E>, id: ScopeId) -> Span {
    match ctx.scoped(id) {
        ScopedValue::Lexeme(span) => *span,
        _ => panic!("same_identifier scope id does not hold a captured lexeme"),
    }
}

impl<E, R> Rule<E> for SameIdentifier<R>
where
    E: Encoding,
    R: BranchRule<E, Output = Span>,
{
    type Output = Span;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let span = self.rule.parse(ctx, reader)?;
        let expected = expected_span(ctx, self.id);
        if reader.slice(span) == reader.slice(expected) {
            Ok(span)
        } else {
            ctx.emit_error(ParseError::new(ErrorKind::DifferentIdentifier, span));
            Err(Failed)
        }
    }
}

impl<E, R> BranchRule<E> for SameIdentifier<R>
where
    E: Encoding,
    R: BranchRule<E, Output = Span>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let span = match self.rule.try_parse(ctx, reader) {
            Branch::Taken(span) => span,
            Branch::Backtracked => return Branch::Backtracked,
            Branch::Failed => return Branch::Failed,
        };
        let expected = expected_span(ctx, self.id);
        if reader.slice(span) == reader.slice(expected) {
            Branch::Taken(span)
        } else {
            ctx.emit_error(ParseError::new(ErrorKind::DifferentIdentifier, span));
            Branch::Failed
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::tokens::Class;
    use crate::charclass::Alpha;

    fn ident() -> impl BranchRule<Byte, Output = Span> {
        Class::new(Alpha)
    }

    #[test]
    fn accepts_a_repeated_identifier() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"aa");
        let first = Rule::parse(&ident(), &mut ctx, &mut reader).expect("first ident");
        let id = ScopeId(0);
        let mut scoped = ctx.push_scope(id, ScopedValue::Lexeme(first));
        let rule = same_identifier(id, ident());
        assert!(Rule::parse(&rule, &mut scoped, &mut reader).is_ok());
    }

    #[test]
    fn rejects_a_different_identifier() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"ab");
        let first = Rule::parse(&ident(), &mut ctx, &mut reader).expect("first ident");
        let id = ScopeId(0);
        let mut scoped = ctx.push_scope(id, ScopedValue::Lexeme(first));
        let rule = same_identifier(id, ident());
        assert!(Rule::parse(&rule, &mut scoped, &mut reader).is_err());
        assert!(matches!(validate.errors()[0].kind, crate::error::ErrorKind::DifferentIdentifier));
    }
}
