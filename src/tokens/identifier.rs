//! `identifier(lead, trail)`: one `lead`-class byte, then a
//! greedy run of `trail`-class bytes, with an optional reserved-word list
//! (`.reserve(&[...])`) that turns a would-be match of a reserved word into
//! a silent backtrack — letting `choice(keyword(...), identifier(...))`
//! resolve to the keyword branch instead of swallowing it as a plain name.

use crate::charclass::ByteClass;
use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

pub struct Identifier<Lead, Trail> {
    lead: Lead,
    trail: Trail,
    reserved: &'static [&'static str],
}

pub fn identifier<Lead, Trail>(lead: Lead, trail: Trail) -> Identifier<Lead, Trail> {
    Identifier { lead, trail, reserved: &[] }
}

impl<Lead, Trail> Identifier<Lead, Trail> {
    /// Words that, matched in full, disqualify this rule from claiming the
    /// text as a plain identifier (e.g. language keywords).
    pub fn reserve(mut self, reserved: &'static [&'static str]) -> Self {
        self.reserved = reserved;
        self
    }
}

impl<Lead: ByteClass, Trail: ByteClass> Identifier<Lead, Trail> {
    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<Span> {
        let start = reader.position();
        let byte = reader.peek()?;
        if !self.lead.contains(byte) {
            return None;
        }
        reader.bump();
        while let Some(b) = reader.peek() {
            if !self.trail.contains(b) {
                break;
            }
            reader.bump();
        }
        Some(reader.span_since(start))
    }

    fn is_reserved<E: Encoding>(&self, reader: &Reader<'_, E>, span: Span) -> bool {
        let text = reader.slice(span);
        self.reserved.iter().any(|word| word.as_bytes() == text)
    }
}

impl<E: Encoding, Lead: ByteClass, Trail: ByteClass> Rule<E> for Identifier<Lead, Trail> {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    /// Committed use is not just "try_parse, then turn a backtrack into an
    /// error": a reserved word still satisfies the lead/trail shape, so it
    /// is consumed and reported as `reserved_identifier` rather than treated
    /// as though the identifier never matched at all — a reserved-word match
    /// emits `reserved_identifier` after consuming the text, not instead. Only
    /// `try_parse`'s branch-probe reading backtracks on a reserved word, so a
    /// `choice(keyword(...), identifier(...))` can still resolve to the
    /// keyword arm.
    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some(span) if self.is_reserved(reader, span) => {
                ctx.emit_token(reader, TokenKind::IDENTIFIER, span);
                let found = String::from_utf8_lossy(reader.slice(span)).into_owned();
                ctx.emit_error(ParseError::new(ErrorKind::ReservedIdentifier { found }, span));
                Ok(span)
            }
            Some(span) => {
                ctx.emit_token(reader, TokenKind::IDENTIFIER, span);
                Ok(span)
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::ExpectedCharClass { class_name: Lead::NAME }, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding, Lead: ByteClass, Trail: ByteClass> BranchRule<E> for Identifier<Lead, Trail> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        match self.try_match(reader) {
            Some(span) if self.is_reserved(reader, span) => {
                *reader = entry;
                Branch::Backtracked
            }
            Some(span) => {
                ctx.emit_token(reader, TokenKind::IDENTIFIER, span);
                Branch::Taken(span)
            }
            None => Branch::Backtracked,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::charclass::{Alnum, Alpha};
    use crate::context::ControlBlock;
    use crate::encoding::Byte;

    fn rule() -> Identifier<Alpha, Alnum> {
        identifier(Alpha, Alnum).reserve(&["return", "if"])
    }

    #[test]
    fn matches_a_lead_then_greedy_trail() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"foo2bar baz");
        let span = Rule::parse(&rule(), &mut ctx, &mut reader).expect("matches");
        assert_eq!(span.len, 7);
    }

    #[test]
    fn backtracks_silently_on_a_reserved_word() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"return");
        assert!(matches!(rule().try_parse(&mut ctx, &mut reader), Branch::Backtracked));
        assert_eq!(reader.position().0, 0);
        assert_eq!(validate.errors().len(), 0);
    }

    #[test]
    fn top_level_parse_of_a_reserved_word_still_consumes_it_and_reports_reserved() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"return");
        let span = Rule::parse(&rule(), &mut ctx, &mut reader).expect("still yields the identifier lexeme");
        assert_eq!(span.len, 6);
        assert_eq!(reader.position().0, 6);
        assert_eq!(validate.errors().len(), 1);
        assert!(matches!(validate.errors()[0].kind, crate::error::ErrorKind::ReservedIdentifier { .. }));
    }

    #[test]
    fn a_reserved_word_with_extra_trailing_chars_is_not_reserved() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"returning");
        assert!(Rule::parse(&rule(), &mut ctx, &mut reader).is_ok());
    }
}
