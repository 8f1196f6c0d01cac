//! `ParseAsTree` (feature `tree`): builds a generic parse tree of
//! production/token nodes alongside the normal value a grammar computes, for
//! grammar debugging and visualization rather than for production use.
//!
//! Unlike [`super::parse::Parse`], the tree this produces carries only
//! structural information (which production matched where, which tokens it
//! covered) rather than each production's actual value — threading an
//! arbitrary `T` through a heterogeneous tree would need `Box<dyn Any>` at
//! every node, which the handler trait's `on_production_finish<T>` can't
//! require `T: 'static` for without also requiring it of every other
//! action. `Output<T> = T` still passes the real value through untouched;
//! call [`ParseAsTree::into_tree`] separately for the shape.

use crate::error::ParseError;
use crate::handler::{Handler, ProductionId};
use crate::span::{Pos, Span};
use crate::token::{Token, TokenKind};

/// One child of a [`TreeNode`]: either a matched token or a nested
/// production.
#[derive(Debug)]
pub enum TreeChild {
    Token(Token),
    Node(TreeNode),
}

/// A production's matched range and the tokens/sub-productions within it.
#[derive(Debug)]
pub struct TreeNode {
    pub production: ProductionId,
    pub span: Span,
    pub children: Vec<TreeChild>,
}

impl TreeNode {
    /// All tokens directly under this node, skipping nested productions.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|c| match c {
            TreeChild::Token(t) => Some(t),
            TreeChild::Node(_) => None,
        })
    }
}

struct Frame {
    production: ProductionId,
    start: Pos,
    children: Vec<TreeChild>,
}

pub struct ParseAsTree {
    stack: Vec<Frame>,
    root: Option<TreeNode>,
    errors: Vec<ParseError>,
}

impl ParseAsTree {
    pub fn new() -> Self {
        ParseAsTree { stack: Vec::new(), root: None, errors: Vec::new() }
    }

    /// The finished tree, if a root production ran to completion.
    pub fn into_tree(self) -> Option<TreeNode> {
        self.root
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for ParseAsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ParseAsTree {
    type Output<T> = T;

    fn on_production_start(&mut self, production: ProductionId, pos: Pos) {
        self.stack.push(Frame { production, start: pos, children: Vec::new() });
    }

    fn on_production_finish<T>(&mut self, production: ProductionId, pos: Pos, value: T) -> Self::Output<T> {
        let frame = self.stack.pop().expect("production_finish without a matching production_start");
        debug_assert_eq!(frame.production, production);
        let node = TreeNode { production, span: Span::new(frame.start, pos), children: frame.children };
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(TreeChild::Node(node)),
            None => self.root = Some(node),
        }
        value
    }

    fn on_production_cancel(&mut self, _production: ProductionId, _pos: Pos) {
        self.stack.pop();
    }

    fn on_token(&mut self, kind: TokenKind, span: Span) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(TreeChild::Token(Token::new(kind, span)));
        }
    }

    fn on_error(&mut self, err: ParseError) -> bool {
        self.errors.push(err);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nests_tokens_under_the_innermost_open_production() {
        let mut tree = ParseAsTree::new();
        tree.on_production_start(ProductionId("outer"), Pos(0));
        tree.on_token(TokenKind::LITERAL, Span { offset: 0, len: 1 });
        tree.on_production_start(ProductionId("inner"), Pos(1));
        tree.on_token(TokenKind::DIGITS, Span { offset: 1, len: 2 });
        tree.on_production_finish(ProductionId("inner"), Pos(3), ());
        tree.on_production_finish(ProductionId("outer"), Pos(3), ());

        let root = tree.into_tree().expect("root present");
        assert_eq!(root.production, ProductionId("outer"));
        assert_eq!(root.children.len(), 2);
        assert!(matches!(root.children[0], TreeChild::Token(_)));
        assert!(matches!(root.children[1], TreeChild::Node(_)));
    }
}
