//! `Trace` (feature `trace`): logs every parse event through the
//! `tracing` crate, indented by nesting depth, for grammar debugging — every
//! engine event gets a line, not just production boundaries.

use crate::error::ParseError;
use crate::handler::{Handler, ProductionId};
use crate::span::{Pos, Span};
use crate::token::TokenKind;

/// Wraps an inner handler, logging each event at `trace` level (prefixed
/// with indentation matching production nesting) before forwarding it.
pub struct Trace<H> {
    inner: H,
    depth: usize,
}

impl<H> Trace<H> {
    pub fn new(inner: H) -> Self {
        Trace { inner, depth: 0 }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl<H: Handler> Handler for Trace<H> {
    type Output<T> = H::Output<T>;

    fn on_production_start(&mut self, production: ProductionId, pos: Pos) {
        tracing::trace!("{}-> {} @ {}", self.indent(), production.0, pos.0);
        self.depth += 1;
        self.inner.on_production_start(production, pos);
    }

    fn on_production_finish<T>(&mut self, production: ProductionId, pos: Pos, value: T) -> Self::Output<T> {
        self.depth = self.depth.saturating_sub(1);
        tracing::trace!("{}<- {} @ {}", self.indent(), production.0, pos.0);
        self.inner.on_production_finish(production, pos, value)
    }

    fn on_production_cancel(&mut self, production: ProductionId, pos: Pos) {
        self.depth = self.depth.saturating_sub(1);
        tracing::trace!("{}x  {} @ {}", self.indent(), production.0, pos.0);
        self.inner.on_production_cancel(production, pos);
    }

    fn on_token(&mut self, kind: TokenKind, span: Span) {
        tracing::trace!("{}token {} {}", self.indent(), kind.as_str(), span);
        self.inner.on_token(kind, span);
    }

    fn on_error(&mut self, err: ParseError) -> bool {
        tracing::debug!("{}error {}", self.indent(), err);
        self.inner.on_error(err)
    }

    fn on_recovery_start(&mut self, pos: Pos) {
        tracing::trace!("{}recovery start @ {}", self.indent(), pos.0);
        self.inner.on_recovery_start(pos);
    }

    fn on_recovery_finish(&mut self, pos: Pos) {
        tracing::trace!("{}recovery finish @ {}", self.indent(), pos.0);
        self.inner.on_recovery_finish(pos);
    }

    fn on_recovery_cancel(&mut self, pos: Pos) {
        tracing::trace!("{}recovery cancel @ {}", self.indent(), pos.0);
        self.inner.on_recovery_cancel(pos);
    }

    fn on_backtracked(&mut self, span: Span) {
        tracing::trace!("{}backtrack {}", self.indent(), span);
        self.inner.on_backtracked(span);
    }

    fn on_debug(&mut self, pos: Pos, label: &str) {
        tracing::debug!("{}{} @ {}", self.indent(), label, pos.0);
        self.inner.on_debug(pos, label);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;

    #[test]
    fn forwards_to_the_inner_handler() {
        let mut trace = Trace::new(Validate::new());
        trace.on_production_start(ProductionId("p"), Pos(0));
        trace.on_token(TokenKind::LITERAL, Span { offset: 0, len: 1 });
        trace.on_production_finish(ProductionId("p"), Pos(1), ());
        assert!(trace.into_inner().is_success());
    }
}
