//! `Validate`: runs a grammar purely to check whether the input
//! matches, discarding every production's value — a cheap "does this parse"
//! pre-check ahead of a full parse, made into a proper first-class action.

use crate::error::ParseError;
use crate::handler::{Handler, ProductionId};
use crate::span::{Pos, Span};
use crate::token::TokenKind;

/// Discards production values and token text, keeping only whether the
/// parse succeeded and the errors encountered along the way.
pub struct Validate {
    errors: Vec<ParseError>,
    error_limit: Option<usize>,
    token_count: u64,
}

impl Validate {
    pub fn new() -> Self {
        Validate { errors: Vec::new(), error_limit: None, token_count: 0 }
    }

    /// Stops recovery (returns `false` from `on_error`) once `limit` errors
    /// have accumulated, instead of the default of always recovering.
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

    pub fn token_count(&self) -> u64 {
        self.token_count
    }
}

impl Default for Validate {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Validate {
    type Output<T> = ();

    fn on_production_start(&mut self, _production: ProductionId, _pos: Pos) {}

    fn on_production_finish<T>(&mut self, _production: ProductionId, _pos: Pos, _value: T) -> Self::Output<T> {}

    fn on_production_cancel(&mut self, _production: ProductionId, _pos: Pos) {}

    fn on_token(&mut self, _kind: TokenKind, _span: Span) {
        self.token_count += 1;
    }

    fn on_error(&mut self, err: ParseError) -> bool {
        self.errors.push(err);
        match self.error_limit {
            Some(limit) => self.errors.len() < limit,
            None => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_successful() {
        let v = Validate::new();
        assert!(v.is_success());
    }

    #[test]
    fn error_limit_stops_recovery() {
        let mut v = Validate::new().with_error_limit(2);
        let err = || ParseError::new(crate::error::ErrorKind::ExhaustedChoice, Span { offset: 0, len: 0 });
        assert!(v.on_error(err()));
        assert!(!v.on_error(err()));
        assert_eq!(v.errors().len(), 2);
    }
}
