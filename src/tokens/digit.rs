//! `digit`/`digits`/`n_digits`: digit matching with an optional separator
//! discipline and an optional forbidden-leading-zero check.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::error::{ErrorKind, ParseError};
use crate::handler::Handler;
use crate::reader::Reader;
use crate::span::Span;
use crate::token::TokenKind;

/// A numeric base a digit rule accepts.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Base {
    fn contains(self, byte: u8) -> bool {
        match self {
            Base::Binary => matches!(byte, b'0'..=b'1'),
            Base::Octal => matches!(byte, b'0'..=b'7'),
            Base::Decimal => byte.is_ascii_digit(),
            Base::Hex => byte.is_ascii_hexdigit(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Base::Binary => "a binary digit",
            Base::Octal => "an octal digit",
            Base::Decimal => "a digit",
            Base::Hex => "a hexadecimal digit",
        }
    }
}

/// Matches exactly one digit of `base`.
#[derive(Clone, Copy, Debug)]
pub struct Digit(pub Base);

impl Digit {
    fn try_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<Span> {
        let start = reader.position();
        let byte = reader.peek()?;
        if !self.0.contains(byte) {
            return None;
        }
        reader.bump();
        Some(reader.span_since(start))
    }
}

impl<E: Encoding> Rule<E> for Digit {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, TokenKind::DIGITS, span);
                Ok(span)
            }
            None => {
                let pos = reader.position();
                ctx.emit_error(ParseError::new(ErrorKind::ExpectedCharClass { class_name: self.0.name() }, Span { offset: pos.0, len: 0 }));
                Err(Failed)
            }
        }
    }
}

impl<E: Encoding> BranchRule<E> for Digit {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.try_match(reader) {
            Some(span) => {
                ctx.emit_token(reader, TokenKind::DIGITS, span);
                Branch::Taken(span)
            }
            None => Branch::Backtracked,
        }
    }
}

/// One-or-more digits of `base`, with an optional separator token between
/// groups and an optional forbidden-leading-zero check.
///
/// `sep` is type-erased to a boxed closure (rather than a third generic
/// parameter on `Digits`) so `.sep(lit("_"))` reads as a plain builder call,
/// without forcing every `Digits` user to name the separator's concrete
/// type.
pub struct Digits<E: Encoding> {
    base: Base,
    sep: Option<Box<dyn Fn(&mut Reader<'_, E>) -> Option<u32>>>,
    no_leading_zero: bool,
}

pub fn digits<E: Encoding>(base: Base) -> Digits<E> {
    Digits { base, sep: None, no_leading_zero: false }
}

impl<E: Encoding> Digits<E> {
    /// Requires digit groups to be separated by a literal string, with no
    /// leading or trailing separator permitted (an extra trailing separator
    /// is still consumed, but raises a local "expected digit" error — see
    /// the `doubled_separator_is_an_error` test).
    pub fn sep(mut self, separator: &'static str) -> Self {
        self.sep = Some(Box::new(move |reader: &mut Reader<'_, E>| {
            let bytes = separator.as_bytes();
            for (i, &b) in bytes.iter().enumerate() {
                if reader.peek_at(i as u32) != Some(b) {
                    return None;
                }
            }
            Some(bytes.len() as u32)
        }));
        self
    }

    pub fn no_leading_zero(mut self) -> Self {
        self.no_leading_zero = true;
        self
    }

    /// Scans the full digit run (following separators), returning the
    /// overall span. Emits `ExpectedCharClass`/`ExpectedLiteral`-style
    /// structural errors itself since there's no enclosing choice to
    /// attribute a bare backtrack to (this is always used as a leaf rule).
    ///
    /// When `no_leading_zero` is set and the run opens with `'0'`, only the
    /// run of zeros is consumed: if another digit (or separator) follows,
    /// that's a forbidden leading zero and the rule fails right there,
    /// without consuming the rest of the number.
    fn scan<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Span> {
        let start = reader.position();
        let Some(first) = reader.peek() else {
            ctx.emit_error(ParseError::new(ErrorKind::ExpectedCharClass { class_name: self.base.name() }, Span { offset: start.0, len: 0 }));
            return Err(Failed);
        };
        if !self.base.contains(first) {
            ctx.emit_error(ParseError::new(ErrorKind::ExpectedCharClass { class_name: self.base.name() }, Span { offset: start.0, len: 0 }));
            return Err(Failed);
        }

        if self.no_leading_zero && first == b'0' {
            reader.bump();
            while reader.peek() == Some(b'0') {
                reader.bump();
            }
            let followed_by_more_digits = match reader.peek() {
                Some(b) if self.base.contains(b) => true,
                _ => self.sep.as_ref().is_some_and(|sep| sep(reader).is_some()),
            };
            if followed_by_more_digits {
                let span = reader.span_since(start);
                ctx.emit_error(ParseError::new(ErrorKind::ForbiddenLeadingZero, span));
                return Err(Failed);
            }
            return Ok(reader.span_since(start));
        }

        loop {
            if reader.peek().filter(|&b| self.base.contains(b)).is_some() {
                reader.bump();
                continue;
            }
            if let Some(sep) = &self.sep {
                if let Some(sep_len) = sep(reader) {
                    for _ in 0..sep_len {
                        reader.bump();
                    }
                    match reader.peek() {
                        Some(b) if self.base.contains(b) => continue,
                        _ => {
                            let pos = reader.position();
                            ctx.emit_error(ParseError::new(
                                ErrorKind::ExpectedCharClass { class_name: self.base.name() },
                                Span { offset: pos.0, len: 0 },
                            ));
                            return Err(Failed);
                        }
                    }
                }
            }
            break;
        }

        Ok(reader.span_since(start))
    }
}

impl<E: Encoding> Rule<E> for Digits<E> {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let span = self.scan(ctx, reader)?;
        ctx.emit_token(reader, TokenKind::DIGITS, span);
        Ok(span)
    }
}

impl<E: Encoding> BranchRule<E> for Digits<E> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        let entry = *reader;
        if reader.peek().map(|b| self.base.contains(b)) != Some(true) {
            return Branch::Backtracked;
        }
        *reader = entry;
        match Rule::parse(self, ctx, reader) {
            Ok(span) => Branch::Taken(span),
            Err(_) => Branch::Failed,
        }
    }
}

/// Matches exactly `N` digits of `base`, no separator. Fails (restoring the
/// reader) if fewer than `N` digits are available.
pub struct NDigits<const N: usize>(pub Base);

pub fn n_digits<const N: usize>(base: Base) -> NDigits<N> {
    NDigits(base)
}

impl<const N: usize, E: Encoding> Rule<E> for NDigits<N> {
    type Output = Span;
    const IS_BRANCH: bool = true;
    const IS_TOKEN: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let start = reader.position();
        for i in 0..N {
            match reader.peek_at(i as u32) {
                Some(b) if self.0.contains(b) => {}
                _ => {
                    ctx.emit_error(ParseError::new(ErrorKind::ExpectedCharClass { class_name: self.0.name() }, Span { offset: start.0, len: 0 }));
                    return Err(Failed);
                }
            }
        }
        for _ in 0..N {
            reader.bump();
        }
        let span = reader.span_since(start);
        ctx.emit_token(reader, TokenKind::DIGITS, span);
        Ok(span)
    }
}

impl<const N: usize, E: Encoding> BranchRule<E> for NDigits<N> {
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        for i in 0..N {
            match reader.peek_at(i as u32) {
                Some(b) if self.0.contains(b) => {}
                _ => return Branch::Backtracked,
            }
        }
        match Rule::parse(self, ctx, reader) {
            Ok(span) => Branch::Taken(span),
            Err(_) => Branch::Failed,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;

    fn run(input: &[u8], rule: &Digits<Byte>) -> (ParseResult<Span>, usize, Reader<'_, Byte>) {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        let result = rule.parse(&mut ctx, &mut reader);
        let errors = validate.errors().len();
        (result, errors, reader)
    }

    #[test]
    fn single_zero_is_not_a_leading_zero() {
        let rule = digits::<Byte>(Base::Decimal).no_leading_zero();
        let (result, errors, _) = run(b"0", &rule);
        assert!(result.is_ok());
        assert_eq!(errors, 0);
    }

    #[test]
    fn multi_digit_leading_zero_fails_after_the_zero_run() {
        let rule = digits::<Byte>(Base::Decimal).no_leading_zero();
        let (result, errors, reader) = run(b"007", &rule);
        assert!(result.is_err());
        assert_eq!(errors, 1);
        assert_eq!(reader.position().0, 2);
    }

    #[test]
    fn separator_allows_grouping() {
        let rule = digits::<Byte>(Base::Decimal).sep("_");
        let (result, errors, reader) = run(b"1_000", &rule);
        assert!(result.is_ok());
        assert_eq!(errors, 0);
        assert_eq!(reader.position().0, 5);
    }

    #[test]
    fn doubled_separator_is_an_error() {
        let rule = digits::<Byte>(Base::Decimal).sep("_");
        let (result, _, _) = run(b"1__0", &rule);
        assert!(result.is_err());
    }
}
