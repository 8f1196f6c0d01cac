//! Literal sets: compiling N string literals into a trie so "longest
//! literal that is a prefix of the input" is one pass, rather than trying
//! each literal in turn.

use std::collections::BTreeMap;

struct TrieNode {
    /// Index into `LiteralSet::literals` of the literal that accepts at this
    /// node, if any.
    accept: Option<u32>,
    children: BTreeMap<u8, u32>,
}

/// A compiled set of string literals. Build once (typically behind a
/// `OnceLock`, the way a keyword or token table is usually memoized) and
/// match repeatedly; matching never allocates.
pub struct LiteralSet {
    nodes: Vec<TrieNode>,
    literals: Vec<&'static str>,
}

/// The result of matching a [`LiteralSet`] against a byte slice.
#[derive(Clone, Copy, Debug)]
pub struct LiteralMatch {
    pub index: usize,
    pub len: u32,
}

impl LiteralSet {
    /// Builds a trie from `literals`. Panics if any two literals are
    /// identical — duplicate literals are disallowed at construction time.
    pub fn new(literals: &[&'static str]) -> Self {
        let mut set = LiteralSet { nodes: vec![TrieNode { accept: None, children: BTreeMap::new() }], literals: Vec::new() };
        for &lit in literals {
            set.insert(lit);
        }
        set
    }

    fn insert(&mut self, literal: &'static str) {
        let mut node = 0usize;
        for &byte in literal.as_bytes() {
            node = match self.nodes[node].children.get(&byte) {
                Some(&next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode { accept: None, children: BTreeMap::new() });
                    self.nodes[node].children.insert(byte, next as u32);
                    next
                }
            };
        }
        let index = self.literals.len() as u32;
        assert!(
            self.nodes[node].accept.is_none(),
            "duplicate literal {literal:?} in a literal set"
        );
        self.nodes[node].accept = Some(index);
        self.literals.push(literal);
    }

    /// Matches the longest literal that is a prefix of `input`. Ties at
    /// equal length are broken by insertion order (handled naturally here
    /// since a node can only ever accept the literal inserted into it).
    pub fn longest_match(&self, input: &[u8]) -> Option<LiteralMatch> {
        let mut node = 0usize;
        let mut best: Option<LiteralMatch> = None;
        for (consumed, &byte) in input.iter().enumerate() {
            let Some(&next) = self.nodes[node].children.get(&byte) else {
                break;
            };
            node = next as usize;
            if let Some(index) = self.nodes[node].accept {
                best = Some(LiteralMatch { index: index as usize, len: consumed as u32 + 1 });
            }
        }
        best
    }

    pub fn literal(&self, index: usize) -> &'static str {
        self.literals[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let set = LiteralSet::new(&["a", "ab", "abc"]);
        let m = set.longest_match(b"abcd").unwrap();
        assert_eq!(set.literal(m.index), "abc");
        assert_eq!(m.len, 3);
    }

    #[test]
    fn no_prefix_matches() {
        let set = LiteralSet::new(&["xyz"]);
        assert!(set.longest_match(b"abcd").is_none());
    }

    #[test]
    fn tie_broken_by_insertion_order() {
        // Can't actually tie on length with a trie (each node accepts at
        // most one literal), but inserting a prefix before its extension
        // should still resolve to the longest available match.
        let set = LiteralSet::new(&["if", "ifx"]);
        assert_eq!(set.longest_match(b"ifx").unwrap().len, 3);
        assert_eq!(set.longest_match(b"if ").unwrap().len, 2);
    }

    #[test]
    #[should_panic(expected = "duplicate literal")]
    fn duplicate_literal_panics() {
        LiteralSet::new(&["a", "a"]);
    }
}
