//! `keyword(text, id)`: a literal that must not be immediately
//! followed by an `id`-class byte, so `keyword("return", ascii::alnum())`
//! doesn't also claim the first six bytes of `returning`. `.case_insensitive()`
//! compares via `unicase::UniCase::ascii`, the same caseless-comparison
//! approach a reserved-word keyword table typically uses.

use crate::charclass::ByteClass;
use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

/// A keyword's text, capped so matching never needs to heap-allocate a
/// scratch buffer for the case-insensitive comparison path.
const MAX_KEYWORD_LEN: usize = 64;

pub struct Keyword<Id> {
    text: &'static str,
    id: Id,
    case_insensitive: bool,
}

pub fn keyword<Id>(text: &'static str, id: Id) -> Keyword<Id> {
    assert!(text.len() <= MAX_KEYWORD_LEN, "keyword text exceeds the supported length");
    Keyword { text, id, case_insensitive: false }
}

impl<Id> Keyword<Id> {
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

impl<Id: ByteClass> Keyword<Id> {
    fn matches<E: Encoding>(&self, reader: &Reader<'_, E>) -> bool {
        let bytes = self.text.as_bytes();
        if self.case_insensitive {
            let mut buf = [0u8; MAX_KEYWORD_LEN];
            for (i, slot) in buf.iter_mut().enumerate().take(bytes.len()) {
                match reader.peek_at(i as u32) {
                    Some(b) => *slot = b,
                    None => return false,
                }
            }
            match std::str::from_utf8(&buf[..bytes.len()]) {
                Ok(candidate) => unicase::UniCase::ascii(candidate) == unicase::UniCase::ascii(self.text),
                Err(_) => false,
            }
        } else {
            bytes.iter().enumerate().all(|(i, &expected)| reader.peek_at(i as u32) == Some(expected))
        }
    }
}

impl<E: Encoding, Id: ByteClass> Rule<E> for Keyword<Id> {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_parse(ctx, reader) {
            Branch::Taken(span) => Ok(span),
            Branch::Failed => Err(Failed),
            Branch::Backtracked => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::ExpectedKeyword { string: self.text }, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding, Id: ByteClass> BranchRule<E> for Keyword<Id> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        if !self.matches(reader) {
            return Branch::Backtracked;
        }
        let len = self.text.len() as u32;
        if reader.peek_at(len).map(|b| self.id.contains(b)).unwrap_or(false) {
            return Branch::Backtracked;
        }
        let start = reader.position();
        for _ in 0..len {
            reader.bump();
        }
        let span = reader.span_since(start);
        ctx.emit_token(reader, TokenKind::UNKNOWN, span);
        Branch::Taken(span)
    }
}
