//! The grammar-authoring surface: re-exports every combinator/token
//! constructor under one path, plus the `seq!`/`choice!` declarative macros
//! and the `ascii` char-class namespace, so a production's `rule()` reads as
//! a flat grammar expression rather than a tree of fully-qualified imports.

pub use crate::combinators::brackets::{brackets, BracketedRule, Brackets};
pub use crate::combinators::capture::{capture, Capture};
pub use crate::combinators::choice::Choice;
pub use crate::combinators::combination::{combination3, partial_combination3, Combination3, PartialCombination3};
pub use crate::combinators::delimited::{delimited, Delimited, DelimitedBuilder, DelimitedEscaped};
pub use crate::combinators::error_rule::{error_, ErrorRule, ErrorRuleSpanning};
pub use crate::combinators::list::{list, opt_list, List, OptList, TrailingSep};
pub use crate::combinators::lookahead::{lookahead, Lookahead};
pub use crate::combinators::opt::{opt, Opt};
pub use crate::combinators::peek::{peek, peek_not, Peek, PeekNot};
pub use crate::combinators::recover::{try_, Try};
pub use crate::combinators::recurse::{recurse, Recurse};
pub use crate::combinators::repeat::{break_, loop_, times, while_, while_one, Break, Loop, Times, While, WhileOne};
pub use crate::combinators::same_identifier::{same_identifier, SameIdentifier};
pub use crate::combinators::scan::{scan, Scan};
pub use crate::combinators::seq::{Seq2, Seq3, Seq4, Then};
pub use crate::combinators::switch::{switch_, Switch};

pub use crate::tokens::{
    bom, code_point, digits, identifier, keyword, lit, minus, n_digits, until, Any, Base, Bom, BomEncoding, Class,
    CodePointToken, Digit, Digits, Endian, Eof, Eol, Identifier, Keyword, Lit, LiteralSetToken, Minus, NDigits,
    Newline, Until,
};

/// Alias for [`peek`] under the name a grammar reads as a non-consuming
/// assertion that `R` matches, rather than a lookahead probe.
pub fn require<R>(rule: R) -> Peek<R> {
    peek(rule)
}

/// Alias for [`peek_not`] under the name a grammar reads as a non-consuming
/// assertion that `R` does *not* match.
pub fn prevent<R>(rule: R) -> PeekNot<R> {
    peek_not(rule)
}

/// Single-byte char-class token rules, each a thin [`Class`] constructor so
/// `ascii::alpha()` reads the way a grammar author expects a primitive
/// matcher to read, without naming the backing [`crate::charclass`] type.
pub mod ascii {
    use crate::charclass::{Alnum, Alpha, Control, Digit as DigitClass, HexDigit, Lower, Punct, Space, Upper};
    use crate::tokens::Class;

    pub fn alpha() -> Class<Alpha> {
        Class::new(Alpha)
    }

    pub fn digit() -> Class<DigitClass> {
        Class::new(DigitClass)
    }

    pub fn alnum() -> Class<Alnum> {
        Class::new(Alnum)
    }

    pub fn upper() -> Class<Upper> {
        Class::new(Upper)
    }

    pub fn lower() -> Class<Lower> {
        Class::new(Lower)
    }

    pub fn space() -> Class<Space> {
        Class::new(Space)
    }

    pub fn punct() -> Class<Punct> {
        Class::new(Punct)
    }

    pub fn control() -> Class<Control> {
        Class::new(Control)
    }

    pub fn hex_digit() -> Class<HexDigit> {
        Class::new(HexDigit)
    }
}

/// `seq![a, b]`, `seq![a, b, c]`, `seq![a, b, c, d]`: builds a
/// [`Seq2`]/[`Seq3`]/[`Seq4`] from a flat list instead of hand-nesting tuples.
/// Arities above four are spelled out by hand at the call site — five or
/// more items need an explicit `Seq2` of `Seq4`s instead.
#[macro_export]
macro_rules! seq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::dsl::Seq2($a, $b)
    };
    ($a:expr, $b:expr, $c:expr $(,)?) => {
        $crate::dsl::Seq3($a, $b, $c)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr $(,)?) => {
        $crate::dsl::Seq4($a, $b, $c, $d)
    };
}

/// `choice![a, b, c, ...]`: right-folds into nested [`Choice`] pairs,
/// `Choice(a, Choice(b, c))`, so an arbitrary-length alternation doesn't need
/// manual nesting — every level shares `a`'s `Output`, so the fold never
/// needs to flatten anything the way [`seq!`] does.
#[macro_export]
macro_rules! choice {
    ($a:expr, $b:expr $(,)?) => {
        $crate::dsl::Choice($a, $b)
    };
    ($a:expr, $($rest:expr),+ $(,)?) => {
        $crate::dsl::Choice($a, $crate::choice!($($rest),+))
    };
}
