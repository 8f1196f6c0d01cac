//! End-to-end scenarios driven through the public `parsekit::parse` entry
//! point rather than a bare combinator — these exercise whitespace
//! resolution, production start/finish bracketing, and commit-once-taken
//! choice semantics together, the way a grammar author's own top-level call
//! would.

use std::rc::Rc;

use parsekit::context::{erase_whitespace, Context, WhitespaceRule};
use parsekit::encoding::Byte;
use parsekit::engine::{ParseResult, Rule};
use parsekit::error::ErrorKind;
use parsekit::handler::{Handler, ProductionId};
use parsekit::production::Production;
use parsekit::reader::Reader;
use parsekit::span::{Pos, Span};
use parsekit::token::TokenKind;
use parsekit::parse;

use parsekit::combinators::choice::Choice;
use parsekit::combinators::seq::{Seq2, Then};
use parsekit::tokens::lit;

#[derive(Debug)]
enum Event {
    Start(&'static str, u32),
    Finish(&'static str, u32),
    Cancel(&'static str, u32),
    Token(TokenKind, Span),
}

/// Records every event in order, for asserting on the exact shape of a top
/// level parse rather than just its final value.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    errors: Vec<ErrorKind>,
}

impl Handler for Recorder {
    type Output<T> = T;

    fn on_production_start(&mut self, production: ProductionId, pos: Pos) {
        self.events.push(Event::Start(production.0, pos.0));
    }

    fn on_production_finish<T>(&mut self, production: ProductionId, pos: Pos, value: T) -> Self::Output<T> {
        self.events.push(Event::Finish(production.0, pos.0));
        value
    }

    fn on_production_cancel(&mut self, production: ProductionId, pos: Pos) {
        self.events.push(Event::Cancel(production.0, pos.0));
    }

    fn on_token(&mut self, kind: TokenKind, span: Span) {
        self.events.push(Event::Token(kind, span));
    }

    fn on_error(&mut self, err: parsekit::ParseError) -> bool {
        self.errors.push(err.kind);
        true
    }
}

/// A whitespace rule with the `Output = ()` shape `Production::whitespace`
/// requires: skips a run of zero or more ASCII spaces.
struct Spaces;

impl Rule<Byte> for Spaces {
    type Output = ();
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, _ctx: &mut Context<'_, H, Byte>, reader: &mut Reader<'_, Byte>) -> ParseResult<()> {
        while reader.peek() == Some(b' ') {
            reader.bump();
        }
        Ok(())
    }
}

fn spaces<H: Handler>() -> Option<Rc<WhitespaceRule<H, Byte>>> {
    Some(erase_whitespace(Spaces))
}

/// §8 scenario 1: `lit<"hello"> + lit<"world">` with `whitespace = space`.
struct Greeting;

impl Production for Greeting {
    type Encoding = Byte;
    type RuleArgs = (Span, Span);
    type Output = (Span, Span);
    const NAME: &'static str = "greeting";
    type RuleType = Seq2<parsekit::tokens::Lit, parsekit::tokens::Lit>;

    fn rule() -> Self::RuleType {
        Seq2(lit("hello"), lit("world"))
    }

    fn whitespace<H: Handler>() -> Option<Rc<WhitespaceRule<H, Self::Encoding>>> {
        spaces::<H>()
    }

    fn value(args: Self::RuleArgs) -> Self::Output {
        args
    }
}

#[test]
fn literal_and_whitespace_with_a_gap() {
    let mut handler = Recorder::default();
    let result = parse::<Greeting, _>(b"hello   world", &mut handler);
    assert!(result.is_ok());
    let whitespace_token = handler.events.iter().find_map(|e| match e {
        Event::Token(kind, span) if *kind == TokenKind::WHITESPACE => Some(*span),
        _ => None,
    });
    assert_eq!(whitespace_token, Some(Span::new(Pos(5), Pos(8))));
    assert!(handler.errors.is_empty());
}

#[test]
fn literal_and_whitespace_with_no_gap() {
    let mut handler = Recorder::default();
    let result = parse::<Greeting, _>(b"helloworld", &mut handler);
    assert!(result.is_ok());
    assert!(handler.errors.is_empty());
}

#[test]
fn literal_and_whitespace_missing_second_word_reports_expected_literal() {
    let mut handler = Recorder::default();
    let result = parse::<Greeting, _>(b"hello", &mut handler);
    assert!(result.is_err());
    assert_eq!(handler.errors.len(), 1);
    match &handler.errors[0] {
        ErrorKind::ExpectedLiteral { string, index_of_first_mismatch } => {
            assert_eq!(*string, "world");
            assert_eq!(*index_of_first_mismatch, 0);
        }
        other => panic!("expected ExpectedLiteral, got {other:?}"),
    }
}

/// §8 scenario 2: `lit<"ab"> >> lit<"c"> | lit<"ab"> | lit<"a">`. Once the
/// first alternative's `"ab"` prefix is taken, the whole arm is committed —
/// a subsequent failure inside it must not fall through to `lit<"ab">` or
/// `lit<"a">`.
struct CommittedChoice;

impl Production for CommittedChoice {
    type Encoding = Byte;
    type RuleArgs = Span;
    type Output = Span;
    const NAME: &'static str = "committed_choice";
    type RuleType = Choice<Then<parsekit::tokens::Lit, parsekit::tokens::Lit>, Choice<parsekit::tokens::Lit, parsekit::tokens::Lit>>;

    fn rule() -> Self::RuleType {
        Choice(Then(lit("ab"), lit("c")), Choice(lit("ab"), lit("a")))
    }

    fn value(span: Self::RuleArgs) -> Self::Output {
        span
    }
}

#[test]
fn first_branch_matches_in_full() {
    let mut handler = Recorder::default();
    let result = parse::<CommittedChoice, _>(b"abc", &mut handler);
    assert!(result.is_ok());
    assert!(handler.errors.is_empty());
}

#[test]
fn committed_prefix_does_not_fall_back_to_a_later_alternative() {
    let mut handler = Recorder::default();
    let result = parse::<CommittedChoice, _>(b"ab", &mut handler);
    assert!(result.is_err());
    assert_eq!(handler.errors.len(), 1);
    assert!(matches!(handler.errors[0], ErrorKind::ExpectedLiteral { string: "c", .. }));
}

#[test]
fn both_ab_arms_backtrack_so_the_bare_a_alternative_wins() {
    let mut handler = Recorder::default();
    let result = parse::<CommittedChoice, _>(b"a", &mut handler);
    assert!(result.is_ok());
    assert!(handler.errors.is_empty());
}

#[test]
fn production_start_and_finish_bracket_the_whole_parse() {
    let mut handler = Recorder::default();
    let _ = parse::<Greeting, _>(b"hello world", &mut handler);
    assert!(matches!(handler.events.first(), Some(Event::Start("greeting", 0))));
    assert!(matches!(handler.events.last(), Some(Event::Finish("greeting", _))));
}
