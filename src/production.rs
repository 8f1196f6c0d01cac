//! Productions: a named grammar rule with an associated value construction,
//! optional whitespace, and an optional recursion budget.
//!
//! A production is "a named grammar fragment with a value constructor," the
//! same shape as a hand-written per-statement parse function — but reified
//! here as a trait so generic combinators (`recurse`, `brackets`, ...) can be
//! written once against any production instead of against one statement
//! function at a time.

use std::rc::Rc;

use crate::context::{erase_whitespace, Context, WhitespaceRule};
use crate::encoding::Encoding;
use crate::engine::{ParseResult, Rule};
use crate::handler::{Handler, ProductionId};
use crate::reader::Reader;

/// A named grammar rule with an associated value constructor.
///
/// `Encoding` is an associated type rather than a parameter on `Production`
/// itself so that `recurse::<P>()` (see `src/combinators/recurse.rs`) can
/// name `P` without also having to repeat its encoding at every use site.
pub trait Production {
    type Encoding: Encoding;
    /// The values `Self::rule()` produces, fed into `Self::value`.
    type RuleArgs;
    type Output;

    /// A stable name for diagnostics (tracing spans, `Trace` action output).
    const NAME: &'static str;

    /// The recursion budget this production enforces on itself; defaults to
    /// [`crate::context::ControlBlock::DEFAULT_MAX_DEPTH`].
    const MAX_RECURSION_DEPTH: u32 = crate::context::ControlBlock::DEFAULT_MAX_DEPTH;

    /// Disables implicit whitespace skipping anywhere inside this
    /// production's subtree, regardless of what an enclosing production or
    /// the root declares.
    const IS_TOKEN_PRODUCTION: bool = false;

    /// Tree-building actions (`ParseAsTree`) do not emit a node for this
    /// production when set — its matched tokens are attributed to the
    /// nearest non-transparent ancestor instead.
    const IS_TRANSPARENT: bool = false;

    type RuleType: Rule<Self::Encoding, Output = Self::RuleArgs>;

    /// The production's grammar.
    fn rule() -> Self::RuleType;

    /// The whitespace rule implicitly skipped between this production's
    /// tokens, if it declares one. `None` falls through to the root
    /// production's whitespace.
    fn whitespace<H: Handler>() -> Option<Rc<WhitespaceRule<H, Self::Encoding>>> {
        None
    }

    /// Builds this production's value from the arguments its `rule()`
    /// produced.
    fn value(args: Self::RuleArgs) -> Self::Output;
}

/// Drives a production end to end: emits `production_start`, enters the
/// recursion and whitespace scopes, runs `P::rule()`, and emits exactly one
/// of `production_finish`/`production_cancel` before returning.
///
/// This is the one place the engine enforces "every `production_start` gets
/// exactly one matching `finish`/`cancel`" and "recursion depth never
/// exceeds the declared maximum"; every combinator that wraps a
/// `Production` (`recurse`, a top-level `parse` call) must go through this
/// function rather than calling `P::rule().parse(...)` directly.
pub fn drive_production<P, H>(
    ctx: &mut Context<'_, H, P::Encoding>,
    reader: &mut Reader<'_, P::Encoding>,
) -> ParseResult<H::Output<P::Output>>
where
    P: Production,
    H: Handler,
{
    let id = ProductionId(P::NAME);
    let pos = reader.position();
    ctx.emit_production_start(id, pos);
    ctx.set_root_production(id);

    let mut depth_guard = match ctx.enter_production(P::MAX_RECURSION_DEPTH, pos) {
        Ok(guard) => guard,
        Err(failed) => {
            ctx.emit_production_cancel(id, pos);
            return Err(failed);
        }
    };

    let whitespace = P::whitespace::<H>();
    let mut ws_guard = depth_guard.enter_whitespace_scope(whitespace, P::IS_TOKEN_PRODUCTION);

    tracing::trace!(production = P::NAME, pos = pos.0, "entering production");

    let result = P::rule().parse(&mut ws_guard, reader);

    match result {
        Ok(args) => {
            let value = P::value(args);
            let end = reader.position();
            drop(ws_guard);
            drop(depth_guard);
            tracing::trace!(production = P::NAME, end = end.0, "production finished");
            Ok(ctx.emit_production_finish(id, end, value))
        }
        Err(failed) => {
            drop(ws_guard);
            drop(depth_guard);
            ctx.emit_production_cancel(id, pos);
            tracing::trace!(production = P::NAME, "production cancelled");
            Err(failed)
        }
    }
}

/// Drives a production the same way [`drive_production`] does, but for
/// embedding inside another production's grammar (`recurse::<P>()`) rather
/// than as the outermost call: it still emits `production_start`/`finish`/
/// `cancel` and enforces the recursion/whitespace scopes, but returns the
/// plain `P::Output` instead of `H::Output<P::Output>` so it can be fed
/// straight back into whatever combinator embeds it.
///
/// The handler's `on_production_finish` return value is discarded here —
/// every bundled action either passes its argument through unchanged or
/// throws it away, and the side effects that matter for a nested production
/// (tree attachment, trace logging) run regardless of what gets returned.
/// Only the top-level call in [`crate::parse`] actually needs the wrapped
/// `H::Output<P::Output>`.
pub fn drive_production_inline<P, H>(
    ctx: &mut Context<'_, H, P::Encoding>,
    reader: &mut Reader<'_, P::Encoding>,
) -> ParseResult<P::Output>
where
    P: Production,
    H: Handler,
{
    let id = ProductionId(P::NAME);
    let pos = reader.position();
    ctx.emit_production_start(id, pos);
    ctx.set_root_production(id);

    let mut depth_guard = match ctx.enter_production(P::MAX_RECURSION_DEPTH, pos) {
        Ok(guard) => guard,
        Err(failed) => {
            ctx.emit_production_cancel(id, pos);
            return Err(failed);
        }
    };

    let whitespace = P::whitespace::<H>();
    let mut ws_guard = depth_guard.enter_whitespace_scope(whitespace, P::IS_TOKEN_PRODUCTION);

    let result = P::rule().parse(&mut ws_guard, reader);

    match result {
        Ok(args) => {
            let value = P::value(args);
            let end = reader.position();
            drop(ws_guard);
            drop(depth_guard);
            let _ = ctx.emit_production_finish(id, end, ());
            Ok(value)
        }
        Err(failed) => {
            drop(ws_guard);
            drop(depth_guard);
            ctx.emit_production_cancel(id, pos);
            Err(failed)
        }
    }
}

/// Convenience alias used by `erase_whitespace` callers: wraps a
/// whitespace-only rule (`Output = ()`) as a [`Production::whitespace`]
/// return value.
pub fn whitespace_of<H, E, W>(rule: W) -> Option<Rc<WhitespaceRule<H, E>>>
where
    H: Handler,
    E: Encoding,
    W: Rule<E, Output = ()> + 'static,
{
    Some(erase_whitespace(rule))
}
