//! `Parse`: runs a grammar to completion and returns the root
//! production's value, the way a grammar author actually wants to consume
//! their own parser — threading errors alongside the returned value rather
//! than raising them.

use crate::error::ParseError;
use crate::handler::{Handler, ProductionId};
use crate::span::{Pos, Span};
use crate::token::TokenKind;

/// Builds each production's real value via `Production::value` (already done
/// by `drive_production`) and passes it straight through; `Output<T> = T`.
/// Errors accumulate the same way `Validate` does, so a partially-recovered
/// parse can still return a value alongside the errors that occurred while
/// producing it.
pub struct Parse {
    errors: Vec<ParseError>,
    error_limit: Option<usize>,
}

impl Parse {
    pub fn new() -> Self {
        Parse { errors: Vec::new(), error_limit: None }
    }

    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for Parse {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Parse {
    type Output<T> = T;

    fn on_production_start(&mut self, _production: ProductionId, _pos: Pos) {}

    fn on_production_finish<T>(&mut self, _production: ProductionId, _pos: Pos, value: T) -> Self::Output<T> {
        value
    }

    fn on_production_cancel(&mut self, _production: ProductionId, _pos: Pos) {}

    fn on_token(&mut self, _kind: TokenKind, _span: Span) {}

    fn on_error(&mut self, err: ParseError) -> bool {
        self.errors.push(err);
        match self.error_limit {
            Some(limit) => self.errors.len() < limit,
            None => true,
        }
    }
}
