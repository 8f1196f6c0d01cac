//! `bom()`: matches a byte order mark at the current position,
//! reporting which [`BomEncoding`]/[`Endian`] it identifies. A grammar
//! typically wraps this in `opt(bom())` at the very start of a production.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Endian {
    Little,
    Big,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum BomEncoding {
    Utf8,
    Utf16(Endian),
    Utf32(Endian),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Bom;

pub fn bom() -> Bom {
    Bom
}

/// Checked longest-first: the 4-byte UTF-32LE mark (`FF FE 00 00`) shares its
/// first two bytes with the UTF-16LE mark, so a shorter pattern must never
/// be tried before a longer one that could also match.
const PATTERNS: &[(&[u8], BomEncoding)] = &[
    (&[0x00, 0x00, 0xFE, 0xFF], BomEncoding::Utf32(Endian::Big)),
    (&[0xFF, 0xFE, 0x00, 0x00], BomEncoding::Utf32(Endian::Little)),
    (&[0xFE, 0xFF], BomEncoding::Utf16(Endian::Big)),
    (&[0xFF, 0xFE], BomEncoding::Utf16(Endian::Little)),
    (&[0xEF, 0xBB, 0xBF], BomEncoding::Utf8),
];

impl Bom {
    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<(Span, BomEncoding)> {
        let start = reader.position();
        for (pattern, encoding) in PATTERNS {
            if pattern.iter().enumerate().all(|(i, &b)| reader.peek_at(i as u32) == Some(b)) {
                for _ in 0..pattern.len() {
                    reader.bump();
                }
                return Some((reader.span_since(start), *encoding));
            }
        }
        None
    }
}

impl<E: Encoding> Rule<E> for Bom {
    type Output = (Span, BomEncoding);
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some((span, encoding)) => {
                ctx.emit_token(reader, TokenKind::UNKNOWN, span);
                Ok((span, encoding))
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(
                    ErrorKind::Unexpected { found: TokenKind::UNKNOWN, expected: "a byte order mark" },
                    Span { offset: pos.0, len: 0 },
                ));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding> BranchRule<E> for Bom {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.try_match(reader) {
            Some((span, encoding)) => {
                ctx.emit_token(reader, TokenKind::UNKNOWN, span);
                Branch::Taken((span, encoding))
            }
            None => Branch::Backtracked,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;

    #[test]
    fn detects_a_utf8_bom() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(&[0xEF, 0xBB, 0xBF, b'x']);
        let (span, encoding) = Rule::parse(&Bom, &mut ctx, &mut reader).expect("matches");
        assert_eq!(span.len, 3);
        assert_eq!(encoding, BomEncoding::Utf8);
    }

    #[test]
    fn prefers_the_longer_utf32_mark_over_utf16() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(&[0xFF, 0xFE, 0x00, 0x00]);
        let (span, encoding) = Rule::parse(&Bom, &mut ctx, &mut reader).expect("matches");
        assert_eq!(span.len, 4);
        assert_eq!(encoding, BomEncoding::Utf32(Endian::Little));
    }

    #[test]
    fn backtracks_without_a_recognized_mark() {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(b"xyz");
        assert!(Rule::parse(&Bom, &mut ctx, &mut reader).is_err());
        assert_eq!(reader.position().0, 0);
    }
}
