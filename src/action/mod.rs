//! Actions: the handlers a parse can be run with. `validate`/`parse`
//! are always available; `tree`/`trace` are opt-in via Cargo features since
//! they carry extra bookkeeping a production grammar doesn't usually want.

pub mod parse;
pub mod validate;

#[cfg(feature = "tree")]
pub mod tree;

#[cfg(feature = "trace")]
pub mod trace;
