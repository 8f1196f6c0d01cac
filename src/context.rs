//! The context threaded through all parsing: a handler reference, a control
//! block, a stack of scoped variables, and the whitespace-resolution state.
//!
//! Per-purpose recursion counters (hand-rolled `Dropper`-style guards around
//! one `usize` field apiece, one per construct that can recurse) are
//! generalized here into one reusable `ControlBlock` depth counter plus a
//! generic `ScopeChain` for everything else a grammar needs to thread
//! through a subtree (counters, flags, captured lexemes).
//! The no-whitespace / token-production markers get their own counters
//! rather than living in `ScopeChain`, since every rule in the engine needs
//! to consult them on every single token and a dedicated `u32` is cheaper
//! than a keyed lookup.

use std::any::Any;
use std::rc::Rc;

use crate::encoding::Encoding;
use crate::engine::ParseResult;
use crate::error::{ErrorKind, ParseError};
use crate::handler::{Handler, ProductionId};
use crate::reader::Reader;
use crate::span::{Pos, Span};

/// A production's whitespace rule, type-erased so `Context` can hold "the
/// current production's whitespace" and "the root production's whitespace"
/// without `Context` itself growing a type parameter per grammar.
pub type WhitespaceRule<H, E> = dyn Fn(&mut Context<'_, H, E>, &mut Reader<'_, E>) -> ParseResult<()>;

/// Wraps a concrete whitespace [`crate::engine::Rule`] as a [`WhitespaceRule`]
/// closure, so `Context` can store it alongside whitespace rules coming from
/// other productions with unrelated concrete types.
pub fn erase_whitespace<H, E, W>(rule: W) -> Rc<WhitespaceRule<H, E>>
where
    H: Handler,
    E: Encoding,
    W: crate::engine::Rule<E, Output = ()> + 'static,
{
    Rc::new(move |ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>| rule.parse(ctx, reader))
}

/// Per-parse bookkeeping: recursion depth, optional user parse-state, and
/// which production (if any) is the whitespace-resolution root.
pub struct ControlBlock {
    cur_depth: u32,
    max_depth: u32,
    root_production: Option<ProductionId>,
    user_state: Option<Box<dyn Any>>,
}

impl ControlBlock {
    /// The recursion bound a production gets when it doesn't declare its
    /// own `MAX_RECURSION_DEPTH`.
    pub const DEFAULT_MAX_DEPTH: u32 = 1024;

    pub fn new() -> Self {
        ControlBlock {
            cur_depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            root_production: None,
            user_state: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_user_state<T: Any>(mut self, state: T) -> Self {
        self.user_state = Some(Box::new(state));
        self
    }

    pub fn user_state<T: Any>(&self) -> Option<&T> {
        self.user_state.as_deref().and_then(|b| b.downcast_ref())
    }

    pub fn user_state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_state.as_deref_mut().and_then(|b| b.downcast_mut())
    }

    pub fn cur_depth(&self) -> u32 {
        self.cur_depth
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl Default for ControlBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies a scoped-variable binding, assigned by whatever combinator
/// creates it (context counters, flags, captured identifiers, ...) as a
/// small integer minted per call site via [`ScopeIdAllocator::next`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(pub u32);

/// Anything that can live in a context scope frame: counters, flags,
/// captured lexemes.
pub enum ScopedValue {
    Counter(i64),
    Flag(bool),
    Lexeme(Span),
}

struct ScopeFrame {
    id: ScopeId,
    value: ScopedValue,
}

/// A linear stack of scope frames. Chain depth is small in grammar practice
/// (a handful of nested context-sensitive constructs at most), so an inline
/// `SmallVec` searched from the top beats a heap-allocated `Vec` or a hash
/// map for the common case of never spilling.
#[derive(Default)]
pub struct ScopeChain {
    frames: smallvec::SmallVec<[ScopeFrame; 8]>,
}

impl ScopeChain {
    fn push(&mut self, id: ScopeId, value: ScopedValue) {
        self.frames.push(ScopeFrame { id, value });
    }

    fn pop(&mut self) {
        self.frames.pop().expect("scope guard popped an empty scope chain");
    }

    fn find(&self, id: ScopeId) -> Option<&ScopedValue> {
        self.frames.iter().rev().find(|f| f.id == id).map(|f| &f.value)
    }

    fn find_mut(&mut self, id: ScopeId) -> Option<&mut ScopedValue> {
        self.frames.iter_mut().rev().find(|f| f.id == id).map(|f| &mut f.value)
    }
}

/// Threaded through parsing: a handler, a control block, scoped state, and
/// the whitespace-resolution stack.
pub struct Context<'a, H: Handler, E: Encoding> {
    handler: &'a mut H,
    control: ControlBlock,
    scopes: ScopeChain,
    production_whitespace: Vec<Option<Rc<WhitespaceRule<H, E>>>>,
    root_whitespace: Option<Rc<WhitespaceRule<H, E>>>,
    token_production_depth: u32,
    no_whitespace_depth: u32,
    /// Nonzero while a whitespace rule's own matches are being folded into a
    /// single coalesced `token(whitespace, …)` event covering the whole
    /// consumed span, rather than one event per repetition of the
    /// whitespace rule.
    token_suppressed_depth: u32,
    /// Reader position right after the most recently emitted non-whitespace
    /// token, before any trailing implicit whitespace was skipped. Lets
    /// `capture` report a lexeme that excludes trailing whitespace without
    /// every combinator having to track it itself.
    last_token_end: Pos,
    /// One frame per enclosing `loop_(R)`, innermost last. A `break_()`
    /// reached while parsing `R` sets the top frame; `Loop::parse` checks it
    /// after each iteration to decide whether to stop.
    loop_break: Vec<bool>,
}

/// Pops its scope frame when dropped, including on unwind — a grammar
/// author never has to remember to undo a binding, the same RAII shape as
/// a `Dropper` guard restoring a counter on `Drop`.
pub struct ScopeGuard<'ctx, 'a, H: Handler, E: Encoding> {
    ctx: &'ctx mut Context<'a, H, E>,
}

impl<H: Handler, E: Encoding> Drop for ScopeGuard<'_, '_, H, E> {
    fn drop(&mut self) {
        self.ctx.scopes.pop();
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::Deref for ScopeGuard<'_, 'a, H, E> {
    type Target = Context<'a, H, E>;
    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::DerefMut for ScopeGuard<'_, 'a, H, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

/// Decrements the control block's recursion depth when dropped. Returned by
/// [`Context::enter_production`].
pub struct ProductionGuard<'ctx, 'a, H: Handler, E: Encoding> {
    ctx: &'ctx mut Context<'a, H, E>,
}

impl<H: Handler, E: Encoding> Drop for ProductionGuard<'_, '_, H, E> {
    fn drop(&mut self) {
        self.ctx.control.cur_depth -= 1;
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::Deref for ProductionGuard<'_, 'a, H, E> {
    type Target = Context<'a, H, E>;
    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::DerefMut for ProductionGuard<'_, 'a, H, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

/// Pops the production-whitespace frame (and, for token productions,
/// decrements `token_production_depth`) when dropped. Returned by
/// [`Context::enter_whitespace_scope`].
pub struct WhitespaceScopeGuard<'ctx, 'a, H: Handler, E: Encoding> {
    ctx: &'ctx mut Context<'a, H, E>,
    is_token_production: bool,
}

impl<H: Handler, E: Encoding> Drop for WhitespaceScopeGuard<'_, '_, H, E> {
    fn drop(&mut self) {
        self.ctx.production_whitespace.pop();
        if self.is_token_production {
            self.ctx.token_production_depth -= 1;
        }
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::Deref for WhitespaceScopeGuard<'_, 'a, H, E> {
    type Target = Context<'a, H, E>;
    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::DerefMut for WhitespaceScopeGuard<'_, 'a, H, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

/// Re-enables implicit whitespace skipping within a subtree previously
/// marked `no_whitespace` (used by constructs that need raw, unskipped
/// token boundaries — e.g. a quoted string body — nested inside a region
/// that otherwise forbids them).
pub struct NoWhitespaceGuard<'ctx, 'a, H: Handler, E: Encoding> {
    ctx: &'ctx mut Context<'a, H, E>,
}

impl<H: Handler, E: Encoding> Drop for NoWhitespaceGuard<'_, '_, H, E> {
    fn drop(&mut self) {
        self.ctx.no_whitespace_depth -= 1;
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::Deref for NoWhitespaceGuard<'_, 'a, H, E> {
    type Target = Context<'a, H, E>;
    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::DerefMut for NoWhitespaceGuard<'_, 'a, H, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

/// Pops a `loop_(R)` break frame when dropped. Returned by
/// [`Context::enter_loop`].
pub struct LoopGuard<'ctx, 'a, H: Handler, E: Encoding> {
    ctx: &'ctx mut Context<'a, H, E>,
}

impl<H: Handler, E: Encoding> Drop for LoopGuard<'_, '_, H, E> {
    fn drop(&mut self) {
        self.ctx.loop_break.pop();
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::Deref for LoopGuard<'_, 'a, H, E> {
    type Target = Context<'a, H, E>;
    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> std::ops::DerefMut for LoopGuard<'_, 'a, H, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl<'a, H: Handler, E: Encoding> Context<'a, H, E> {
    pub fn new(handler: &'a mut H, control: ControlBlock) -> Self {
        Context {
            handler,
            control,
            scopes: ScopeChain::default(),
            production_whitespace: Vec::new(),
            root_whitespace: None,
            token_production_depth: 0,
            no_whitespace_depth: 0,
            token_suppressed_depth: 0,
            last_token_end: Pos(0),
            loop_break: Vec::new(),
        }
    }

    pub fn handler(&mut self) -> &mut H {
        self.handler
    }

    pub fn control(&self) -> &ControlBlock {
        &self.control
    }

    /// Increments the recursion counter, failing immediately (emitting
    /// `RecursionExceeded`) if it would exceed `max_depth` for this
    /// production. Returns a guard that decrements on drop.
    pub fn enter_production(
        &mut self,
        max_depth: u32,
        pos: Pos,
    ) -> Result<ProductionGuard<'_, 'a, H, E>, crate::engine::Failed> {
        if self.control.cur_depth >= max_depth {
            self.emit_error(ParseError::new(ErrorKind::RecursionExceeded, Span { offset: pos.0, len: 0 }));
            return Err(crate::engine::Failed);
        }
        self.control.cur_depth += 1;
        Ok(ProductionGuard { ctx: self })
    }

    pub fn set_root_production(&mut self, id: ProductionId) {
        if self.control.root_production.is_none() {
            self.control.root_production = Some(id);
        }
    }

    pub fn root_production(&self) -> Option<ProductionId> {
        self.control.root_production
    }

    /// Enters a production's whitespace scope: pushes `whitespace`
    /// (the production's own rule, or `None` to fall through to the root's)
    /// as the new "current production" whitespace, records the first
    /// production entered as the resolution root, and — for token
    /// productions — disables whitespace skipping entirely for the
    /// duration of the subtree.
    pub fn enter_whitespace_scope(
        &mut self,
        whitespace: Option<Rc<WhitespaceRule<H, E>>>,
        is_token_production: bool,
    ) -> WhitespaceScopeGuard<'_, 'a, H, E> {
        if self.root_whitespace.is_none() && self.production_whitespace.is_empty() {
            self.root_whitespace = whitespace.clone();
        }
        self.production_whitespace.push(whitespace);
        if is_token_production {
            self.token_production_depth += 1;
        }
        WhitespaceScopeGuard { ctx: self, is_token_production }
    }

    /// Disables whitespace skipping for the duration of the returned guard's
    /// lifetime, regardless of what any enclosing production declared.
    pub fn enter_no_whitespace(&mut self) -> NoWhitespaceGuard<'_, 'a, H, E> {
        self.no_whitespace_depth += 1;
        NoWhitespaceGuard { ctx: self }
    }

    /// Opens a new `loop_(R)` break frame for the duration of the returned
    /// guard's lifetime.
    pub fn enter_loop(&mut self) -> LoopGuard<'_, 'a, H, E> {
        self.loop_break.push(false);
        LoopGuard { ctx: self }
    }

    /// Requests that the innermost enclosing `loop_(R)` stop after the
    /// iteration currently in progress finishes. A no-op outside any loop.
    pub fn request_break(&mut self) {
        if let Some(top) = self.loop_break.last_mut() {
            *top = true;
        }
    }

    /// Whether the innermost enclosing loop has had a break requested.
    pub fn break_requested(&self) -> bool {
        self.loop_break.last().copied().unwrap_or(false)
    }

    /// Resolves the whitespace rule active at this point in the parse:
    /// disabled inside a token production, disabled inside a
    /// `no_whitespace` region, else the current production's own rule, else
    /// the root production's rule, else none.
    pub fn active_whitespace(&self) -> Option<Rc<WhitespaceRule<H, E>>> {
        if self.token_production_depth > 0 || self.no_whitespace_depth > 0 {
            return None;
        }
        if let Some(current) = self.production_whitespace.last() {
            if let Some(rule) = current {
                return Some(rule.clone());
            }
        }
        self.root_whitespace.clone()
    }

    /// Pushes a new scope frame, returning a guard that pops it on drop.
    pub fn push_scope(&mut self, id: ScopeId, value: ScopedValue) -> ScopeGuard<'_, 'a, H, E> {
        self.scopes.push(id, value);
        ScopeGuard { ctx: self }
    }

    /// Looks up a scoped variable by id, walking the chain from the top.
    ///
    /// # Panics
    /// Panics if `id` has no enclosing binding — a grammar-construction bug:
    /// a variable referenced outside any binding scope should be caught at
    /// grammar-construction time, and failing loudly and immediately here is
    /// the closest a runtime scope check gets to that.
    pub fn scoped(&self, id: ScopeId) -> &ScopedValue {
        self.scopes.find(id).unwrap_or_else(|| panic!("scope id {id:?} referenced outside any binding scope"))
    }

    pub fn scoped_mut(&mut self, id: ScopeId) -> &mut ScopedValue {
        self.scopes
            .find_mut(id)
            .unwrap_or_else(|| panic!("scope id referenced outside any binding scope"))
    }

    pub fn try_scoped(&self, id: ScopeId) -> Option<&ScopedValue> {
        self.scopes.find(id)
    }

    // -- event forwarding -------------------------------------------------

    pub fn emit_production_start(&mut self, production: ProductionId, pos: Pos) {
        self.handler.on_production_start(production, pos);
    }

    pub fn emit_production_finish<T>(&mut self, production: ProductionId, pos: Pos, value: T) -> H::Output<T> {
        self.handler.on_production_finish(production, pos, value)
    }

    pub fn emit_production_cancel(&mut self, production: ProductionId, pos: Pos) {
        self.handler.on_production_cancel(production, pos);
    }

    /// Records a matched token and, when implicit whitespace is active at
    /// this point, greedily skips it before returning — every token rule
    /// goes through here rather than calling `Handler::on_token` directly,
    /// so whitespace resolution is a property of the engine, not something
    /// each token rule has to remember to do.
    pub fn emit_token(&mut self, reader: &mut Reader<'_, E>, kind: crate::token::TokenKind, span: Span) {
        if self.token_suppressed_depth == 0 {
            self.handler.on_token(kind, span);
        }
        if kind != crate::token::TokenKind::WHITESPACE {
            self.last_token_end = reader.position();
            self.skip_whitespace(reader);
        }
    }

    /// Reader position right after the last non-whitespace token emitted,
    /// before any trailing whitespace skip. See [`Context::emit_token`].
    pub fn last_token_end(&self) -> Pos {
        self.last_token_end
    }

    /// Runs the whitespace rule active at this point greedily — zero or
    /// more repetitions — folding every repetition's own token events into
    /// one coalesced `token(whitespace, span)` covering the whole run,
    /// rather than one event per repetition.
    pub fn skip_whitespace(&mut self, reader: &mut Reader<'_, E>) {
        let Some(rule) = self.active_whitespace() else { return };
        let start = reader.position();
        self.token_suppressed_depth += 1;
        loop {
            let before = reader.position();
            match rule(self, reader) {
                Ok(()) if reader.position() != before => {}
                _ => {
                    reader.set_position(before);
                    break;
                }
            }
        }
        self.token_suppressed_depth -= 1;
        let end = reader.position();
        if end != start {
            self.handler.on_token(crate::token::TokenKind::WHITESPACE, Span::new(start, end));
        }
    }

    /// Reports an error. Returns whether the handler wants parsing to keep
    /// trying to recover (the default for `Validate`/`Parse`); `false` means
    /// the caller should treat this as immediately fatal.
    pub fn emit_error(&mut self, err: ParseError) -> bool {
        self.handler.on_error(err)
    }

    pub fn emit_recovery_start(&mut self, pos: Pos) {
        self.handler.on_recovery_start(pos);
    }

    pub fn emit_recovery_finish(&mut self, pos: Pos) {
        self.handler.on_recovery_finish(pos);
    }

    pub fn emit_recovery_cancel(&mut self, pos: Pos) {
        self.handler.on_recovery_cancel(pos);
    }

    pub fn emit_backtracked(&mut self, span: Span) {
        self.handler.on_backtracked(span);
    }

    pub fn emit_debug(&mut self, pos: Pos, label: &str) {
        self.handler.on_debug(pos, label);
    }
}

/// Mints fresh [`ScopeId`]s for combinators that need one per construction
/// site (context counters, flags, captured identifiers).
pub struct ScopeIdAllocator(std::sync::atomic::AtomicU32);

impl ScopeIdAllocator {
    pub const fn new() -> Self {
        ScopeIdAllocator(std::sync::atomic::AtomicU32::new(0))
    }

    pub fn next(&self) -> ScopeId {
        ScopeId(self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed))
    }
}

impl Default for ScopeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
