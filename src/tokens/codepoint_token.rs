//! `code_point<C>`: decodes one full Unicode scalar value and matches
//! it against a [`CodePointClass`], rather than a single code unit the way
//! [`super::Class`] does.

use crate::charclass::{predicate, CodePointClass, Predicate};
use crate::codepoint::CodePoint;
use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

/// Matches one code point satisfying `C`, decoding multi-byte UTF-8
/// sequences via [`Reader::complete_char`]. An invalid or truncated encoding
/// is treated the same as a classification mismatch: the reader is restored
/// and the failure reported as `ExpectedCharClass`, since this token has no
/// separate "malformed input" channel to report through; decoding
/// diagnostics beyond this are out of scope.
#[derive(Clone, Copy, Debug)]
pub struct CodePointToken<C> {
    class: C,
    kind: TokenKind,
}

impl<C: CodePointClass> CodePointToken<C> {
    pub fn new(class: C) -> Self {
        CodePointToken { class, kind: TokenKind::UNKNOWN }
    }

    pub fn kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<(Span, CodePoint)> {
        let start = reader.position();
        let lead = reader.peek()?;
        reader.bump();
        let cp = match reader.complete_char(lead) {
            Ok(ch) => CodePoint::from(ch),
            Err(_) => {
                reader.set_position(start);
                return None;
            }
        };
        if !self.class.contains(cp) {
            reader.set_position(start);
            return None;
        }
        Some((reader.span_since(start), cp))
    }
}

/// `code_point`: decodes
/// one scalar value with no further classification, failing only on a
/// truncated/invalid encoding.
pub fn code_point() -> CodePointToken<Predicate<fn(CodePoint) -> bool>> {
    CodePointToken::new(predicate("code point", (|_| true) as fn(CodePoint) -> bool))
}

impl<E: Encoding, C: CodePointClass> Rule<E> for CodePointToken<C> {
    type Output = (Span, CodePoint);
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some((span, cp)) => {
                ctx.emit_token(reader, self.kind, span);
                Ok((span, cp))
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::ExpectedCharClass { class_name: C::NAME },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding, C: CodePointClass> BranchRule<E> for CodePointToken<C> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.try_match(reader) {
            Some((span, cp)) => {
                ctx.emit_token(reader, self.kind, span);
                Branch::Taken((span, cp))
            }
            None => Branch::Backtracked,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::charclass::predicate;
    use crate::context::ControlBlock;
    use crate::encoding::Utf8;

    #[test]
    fn decodes_multi_byte_code_point() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Utf8>::new("é".as_bytes());
        let rule = CodePointToken::new(predicate("any", |_| true));
        let (result, _) = (Rule::parse(&rule, &mut ctx, &mut reader), ());
        let (span, cp) = result.expect("decodes");
        assert_eq!(span.len, 2);
        assert_eq!(cp.0, 'é' as u32);
    }

    #[test]
    fn classification_mismatch_restores_reader() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Utf8>::new(b"a");
        let rule = CodePointToken::new(predicate("never", |_| false));
        assert!(Rule::parse(&rule, &mut ctx, &mut reader).is_err());
        assert_eq!(reader.position().0, 0);
    }
}
