//! Huffman coding over the characters of a text.
//!
//! Each [`Huffman::encode`] builds a fresh tree from the text's character
//! frequencies and keeps it for later [`Huffman::decode`] calls. Equal
//! frequencies are merged in creation order: leaves in order of first
//! appearance, then merged nodes in the order they were made. That makes the
//! codes for a given text fully deterministic.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use serde::Serialize;

use crate::{
    arena::{Arena, NodeId},
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
};

/// A leaf (with a character) or an internal node (with two children).
#[derive(Debug, Clone)]
struct Node {
    /// The character, for leaves.
    ch: Option<char>,
    /// Total frequency of the subtree.
    freq: usize,
    /// Child reached by a `0` bit.
    left: Option<NodeId>,
    /// Child reached by a `1` bit.
    right: Option<NodeId>,
}

/// A built code tree.
#[derive(Debug, Clone)]
struct Tree {
    /// Node storage.
    nodes: Arena<Node>,
    /// Root node.
    root: NodeId,
}

/// Nested rendering of a code tree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeView {
    /// The character, for leaves; `null` for internal nodes.
    pub char: Option<String>,
    /// Subtree frequency.
    pub freq: usize,
    /// `0` branch.
    pub left: Option<Box<TreeView>>,
    /// `1` branch.
    pub right: Option<Box<TreeView>>,
}

/// Everything produced by one encode call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    /// The tree built for this text; `null` for empty text.
    pub tree: Option<TreeView>,
    /// Code for each distinct character.
    pub codes: BTreeMap<String, String>,
    /// Concatenated codes as a string of `0`/`1`.
    pub encoded: String,
    /// Input size in bits, at 8 bits per character.
    pub original_size: usize,
    /// Encoded size in bits.
    pub compressed_size: usize,
    /// Space saved, in percent.
    pub compression_ratio: f64,
    /// Occurrences of each distinct character.
    pub frequencies: BTreeMap<String, usize>,
}

/// Query view of a Huffman coder.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HuffmanSnapshot {
    /// The current tree, if one has been built.
    pub tree: Option<TreeView>,
    /// Codes of the current tree.
    pub codes: BTreeMap<String, String>,
}

/// A Huffman coder remembering its most recent tree.
#[derive(Debug, Clone, Default)]
pub struct Huffman {
    /// Tree from the last non-empty encode.
    tree: Option<Tree>,
}

/// Character counts in order of first appearance.
fn frequencies(text: &str) -> Vec<(char, usize)> {
    let mut table: Vec<(char, usize)> = Vec::new();
    for c in text.chars() {
        match table.iter_mut().find(|(k, _)| *k == c) {
            Some((_, n)) => *n += 1,
            None => table.push((c, 1)),
        }
    }
    table
}

impl Tree {
    /// Greedily merge the two lightest nodes until one remains.
    ///
    /// The arena is fresh, so node handles order nodes by creation and serve
    /// as the tie-break.
    fn build(freqs: &[(char, usize)]) -> Option<Self> {
        let mut nodes = Arena::new();
        let mut heap = BinaryHeap::new();
        for &(ch, freq) in freqs {
            let id = nodes.alloc(Node {
                ch: Some(ch),
                freq,
                left: None,
                right: None,
            });
            heap.push(Reverse((freq, id)));
        }
        loop {
            let Reverse((fa, a)) = heap.pop()?;
            let Some(Reverse((fb, b))) = heap.pop() else {
                return Some(Self { nodes, root: a });
            };
            let merged = nodes.alloc(Node {
                ch: None,
                freq: fa + fb,
                left: Some(a),
                right: Some(b),
            });
            heap.push(Reverse((fa + fb, merged)));
        }
    }

    /// Root-to-leaf paths for every leaf. A lone leaf gets `"0"`.
    fn codes(&self) -> BTreeMap<char, String> {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(self.root, String::new())];
        while let Some((id, code)) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(ch) = node.ch {
                let code = if code.is_empty() { "0".to_string() } else { code };
                codes.insert(ch, code);
                continue;
            }
            if let Some(r) = node.right {
                stack.push((r, format!("{code}1")));
            }
            if let Some(l) = node.left {
                stack.push((l, format!("{code}0")));
            }
        }
        codes
    }

    /// Nested rendering of the subtree at `id`.
    ///
    /// A code of length `d` needs a text of at least `fib(d + 2)` characters,
    /// so the depth stays logarithmic in the input length.
    fn view(&self, id: NodeId) -> TreeView {
        let node = &self.nodes[id];
        TreeView {
            char: node.ch.map(String::from),
            freq: node.freq,
            left: node.left.map(|l| Box::new(self.view(l))),
            right: node.right.map(|r| Box::new(self.view(r))),
        }
    }

    /// Walk the tree bit by bit, emitting a character at every leaf.
    fn decode(&self, bits: &str) -> Result<String> {
        let root = &self.nodes[self.root];
        let mut out = String::new();
        if let Some(ch) = root.ch {
            // Single-leaf tree: every symbol is the bit `0`.
            for (i, bit) in bits.chars().enumerate() {
                match bit {
                    '0' => out.push(ch),
                    other => return Err(bad_bit(other, i)),
                }
            }
            return Ok(out);
        }

        let mut cursor = self.root;
        for (i, bit) in bits.chars().enumerate() {
            let node = &self.nodes[cursor];
            let next = match bit {
                '0' => node.left,
                '1' => node.right,
                other => return Err(bad_bit(other, i)),
            };
            let next =
                next.ok_or_else(|| Error::invalid(format!("bit {i} leads off the tree")))?;
            match self.nodes[next].ch {
                Some(ch) => {
                    out.push(ch);
                    cursor = self.root;
                }
                None => cursor = next,
            }
        }
        if cursor != self.root {
            return Err(Error::invalid("encoded input ends in the middle of a code"));
        }
        Ok(out)
    }
}

/// Error for a symbol that is not a usable bit at position `i`.
fn bad_bit(bit: char, i: usize) -> Error {
    Error::invalid(format!("unexpected symbol '{bit}' at position {i}"))
}

/// String-keyed copy of a code table.
fn keyed(codes: BTreeMap<char, String>) -> BTreeMap<String, String> {
    codes.into_iter().map(|(c, s)| (c.to_string(), s)).collect()
}

impl Huffman {
    /// A coder with no tree yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree for `text` and encode it.
    ///
    /// Empty text yields an empty encoding and leaves any earlier tree in place.
    pub fn encode(&mut self, text: &str) -> Encoding {
        let freqs = frequencies(text);
        let Some(tree) = Tree::build(&freqs) else {
            return Encoding {
                tree: None,
                codes: BTreeMap::new(),
                encoded: String::new(),
                original_size: 0,
                compressed_size: 0,
                compression_ratio: 0.0,
                frequencies: BTreeMap::new(),
            };
        };

        let codes = tree.codes();
        let encoded: String = text
            .chars()
            .filter_map(|c| codes.get(&c).map(String::as_str))
            .collect();
        let original_size = text.chars().count() * 8;
        let compressed_size = encoded.len();
        let encoding = Encoding {
            tree: Some(tree.view(tree.root)),
            codes: keyed(codes),
            encoded,
            original_size,
            compressed_size,
            compression_ratio: (original_size as f64 - compressed_size as f64)
                / original_size as f64
                * 100.0,
            frequencies: freqs.iter().map(|(c, n)| (c.to_string(), *n)).collect(),
        };
        self.tree = Some(tree);
        encoding
    }

    /// Decode a `0`/`1` string with the most recent tree.
    ///
    /// Without a tree the result is empty. Symbols other than `0` and `1`,
    /// and input that stops partway through a code, are rejected.
    pub fn decode(&self, bits: &str) -> Result<String> {
        match &self.tree {
            Some(tree) => tree.decode(bits),
            None => Ok(String::new()),
        }
    }

    /// Whether a tree has been built.
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }
}

impl Engine for Huffman {
    const KIND: EngineKind = EngineKind::Huffman;
    type Snapshot = HuffmanSnapshot;

    fn snapshot(&self) -> HuffmanSnapshot {
        HuffmanSnapshot {
            tree: self.tree.as_ref().map(|t| t.view(t.root)),
            codes: self.tree.as_ref().map(|t| keyed(t.codes())).unwrap_or_default(),
        }
    }

    fn clear(&mut self) {
        self.tree = None;
    }
}
