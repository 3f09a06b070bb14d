//! Arena-backed prefix tree over key symbols.
//!
//! Nodes live in a single `Vec` and refer to each other by index, so a lookup
//! is a walk of at most `max_depth` binary searches with no pointer chasing
//! through individual allocations.

use super::KeySymbol;

const ROOT: usize = 0;

/// Outcome of walking a key sequence through the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Value id stored at the node reached by the full key, if any.
    pub value: Option<u32>,
    /// Whether the node has children, i.e. a longer key shares this prefix.
    pub has_children: bool,
}

impl ProbeResult {
    const MISS: ProbeResult = ProbeResult {
        value: None,
        has_children: false,
    };
}

#[derive(Debug, Default)]
struct Node {
    /// Sorted by symbol for binary search.
    children: Vec<(KeySymbol, u32)>,
    value: Option<u32>,
}

#[derive(Debug)]
pub struct KeyTrie {
    nodes: Vec<Node>,
    max_depth: usize,
}

impl KeyTrie {
    /// Build a trie where the i-th key maps to value id `i`.
    ///
    /// Keys must be distinct; a repeated key keeps the id of its first
    /// occurrence.
    pub fn build<K: AsRef<str>>(keys: &[K]) -> Self {
        let mut trie = KeyTrie {
            nodes: vec![Node::default()],
            max_depth: 0,
        };
        for (id, key) in keys.iter().enumerate() {
            trie.insert(key.as_ref(), id as u32);
        }
        trie
    }

    fn insert(&mut self, key: &str, id: u32) {
        let mut node = ROOT;
        let mut depth = 0;
        for sym in key.chars() {
            node = match self.child(node, sym) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    let children = &mut self.nodes[node].children;
                    let pos = children.partition_point(|&(s, _)| s < sym);
                    children.insert(pos, (sym, next as u32));
                    next
                }
            };
            depth += 1;
        }
        let slot = &mut self.nodes[node].value;
        if slot.is_none() {
            *slot = Some(id);
        }
        self.max_depth = self.max_depth.max(depth);
    }

    fn child(&self, node: usize, sym: KeySymbol) -> Option<usize> {
        let children = &self.nodes[node].children;
        children
            .binary_search_by_key(&sym, |&(s, _)| s)
            .ok()
            .map(|i| children[i].1 as usize)
    }

    /// Walk `keys` from the root and report what sits at the end.
    pub fn probe(&self, keys: &[KeySymbol]) -> ProbeResult {
        if keys.is_empty() {
            return ProbeResult::MISS;
        }
        let mut node = ROOT;
        for &sym in keys {
            match self.child(node, sym) {
                Some(next) => node = next,
                None => return ProbeResult::MISS,
            }
        }
        let n = &self.nodes[node];
        ProbeResult {
            value: n.value,
            has_children: !n.children.is_empty(),
        }
    }

    /// Longest prefix of `keys` that carries a value, as `(length, id)`.
    pub fn longest_prefix(&self, keys: &[KeySymbol]) -> Option<(usize, u32)> {
        let mut node = ROOT;
        let mut best = None;
        for (i, &sym) in keys.iter().enumerate() {
            match self.child(node, sym) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(id) = self.nodes[node].value {
                best = Some((i + 1, id));
            }
        }
        best
    }

    /// Length of the longest key inserted.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
