//! The action/handler interface: the object that decides what a parse's
//! events become (nothing, a value, a tree node, a trace line).

use crate::error::ParseError;
use crate::span::{Pos, Span};
use crate::token::TokenKind;

/// Identifies a production for event dispatch and tracing. Built from a
/// `Production::NAME`; two different production types sharing a name are
/// only ambiguous in diagnostics, never in parsing (the engine never looks
/// productions up by this id).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ProductionId(pub &'static str);

/// Receives every parse event and decides what to do with it.
///
/// A production's result type is keyed off the *value* it computed rather
/// than off the production type itself, via a generic associated type —
/// simpler to express in Rust and just as expressive, since a handler only
/// ever needs to know the shape of the value it's being handed, not which
/// production type produced it.
pub trait Handler {
    /// What a production's raw value is turned into once finished. `Validate`
    /// discards it (`Output<T> = ()`), `Parse` passes it through
    /// (`Output<T> = T`), `ParseAsTree`/`Trace` wrap it with a node handle.
    type Output<T>;

    fn on_production_start(&mut self, production: ProductionId, pos: Pos);

    fn on_production_finish<T>(&mut self, production: ProductionId, pos: Pos, value: T) -> Self::Output<T>;

    fn on_production_cancel(&mut self, production: ProductionId, pos: Pos);

    fn on_token(&mut self, kind: TokenKind, span: Span);

    /// The parser encountered an error. Returning `false` tells the engine
    /// to treat this as fatal and stop trying to recover further up the
    /// grammar; returning `true` (the default expectation for most actions)
    /// lets recovery combinators like `try_` keep going.
    fn on_error(&mut self, err: ParseError) -> bool;

    fn on_recovery_start(&mut self, _pos: Pos) {}
    fn on_recovery_finish(&mut self, _pos: Pos) {}
    fn on_recovery_cancel(&mut self, _pos: Pos) {}
    fn on_backtracked(&mut self, _span: Span) {}
    fn on_debug(&mut self, _pos: Pos, _label: &str) {}
}
