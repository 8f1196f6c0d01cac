//! The rule/parser protocol: every grammar element is a `Rule<E>`; rules
//! that can be probed without committing additionally implement
//! `BranchRule<E>`.
//!
//! # Why no continuation-passing style
//!
//! A combinator graph built from generic structs composes naturally by each
//! `Rule::parse` simply returning its own `Output`; combinators compose by
//! calling child rules and combining the values they return (see
//! `src/combinators/`) rather than threading an explicit continuation
//! through every call.

use crate::context::Context;
use crate::handler::Handler;
use crate::reader::Reader;
use crate::encoding::Encoding;

/// Failure marker. The engine never encodes *why* a rule failed here — that
/// already went to the handler as an `error` event. `Err(Failed)` just means
/// "this rule did not produce a value"; callers decide from context whether
/// that's a backtrack opportunity or a real error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Failed;

pub type ParseResult<T> = Result<T, Failed>;

/// The outcome of probing a [`BranchRule`] without necessarily committing.
#[derive(Debug)]
pub enum Branch<T> {
    /// The rule's characteristic prefix matched; the reader has been
    /// advanced across everything consumed so far (including the
    /// irreversible part — callers must not rewind past this).
    Taken(T),
    /// The rule did not apply; the reader is exactly where it was.
    Backtracked,
    /// The characteristic prefix matched but something downstream failed;
    /// the reader is at the failure point and an `error` event has already
    /// been emitted. Never a backtrack opportunity.
    Failed,
}

impl<T> Branch<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Branch<U> {
        match self {
            Branch::Taken(v) => Branch::Taken(f(v)),
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }

    pub fn is_taken(&self) -> bool {
        matches!(self, Branch::Taken(_))
    }
}

/// A description of how to consume a portion of input.
///
/// `IS_BRANCH`/`IS_UNCONDITIONAL_BRANCH`/`IS_TOKEN` are type-level facts
/// every rule exposes; they let parent combinators pick a cheaper code path
/// (e.g. `opt(B)` skips probing entirely when `B` is an unconditional
/// branch).
pub trait Rule<E: Encoding> {
    type Output;

    /// Whether this rule can be probed (tried) non-destructively via
    /// [`BranchRule::try_parse`]. A rule with `IS_BRANCH == true` is expected
    /// to also implement [`BranchRule<E>`] — a documentation convention,
    /// since `BranchRule` is a separate trait with its own (stricter)
    /// bounds and can't be enforced from `Rule` alone.
    const IS_BRANCH: bool;

    /// Whether probing always succeeds without consuming input (e.g. `opt`,
    /// `peek`, `while_`). Parent combinators use this to skip a redundant
    /// probe.
    const IS_UNCONDITIONAL_BRANCH: bool = false;

    /// Whether this is a primitive, one-shot consumer with a declared token
    /// kind and no production nesting.
    const IS_TOKEN: bool = false;

    /// Parse this rule against `reader`, threading `ctx` for events and
    /// scoped state.
    ///
    /// Either returns `Ok(value)` having advanced `reader` across everything
    /// consumed, or `Err(Failed)` having either restored `reader` to its
    /// entry position or left it at the failure point with an `error` event
    /// already emitted — never both inconsistently.
    fn parse<H: Handler>(
        &self,
        ctx: &mut Context<'_, H, E>,
        reader: &mut Reader<'_, E>,
    ) -> ParseResult<Self::Output>;
}

/// The two-phase entry point for rules that can be probed without
/// committing.
pub trait BranchRule<E: Encoding>: Rule<E> {
    fn try_parse<H: Handler>(
        &self,
        ctx: &mut Context<'_, H, E>,
        reader: &mut Reader<'_, E>,
    ) -> Branch<Self::Output>;
}

/// Default `Rule::parse` behavior for any `BranchRule`: probe once, and
/// treat both "didn't apply" and "applied but failed downstream" as an
/// ordinary failure. A combinator gets the distinction between the two only
/// by calling `try_parse` itself.
pub fn parse_via_branch<E, R, H>(
    rule: &R,
    ctx: &mut Context<'_, H, E>,
    reader: &mut Reader<'_, E>,
) -> ParseResult<R::Output>
where
    E: Encoding,
    R: BranchRule<E>,
    H: Handler,
{
    match rule.try_parse(ctx, reader) {
        Branch::Taken(v) => Ok(v),
        Branch::Backtracked | Branch::Failed => Err(Failed),
    }
}
