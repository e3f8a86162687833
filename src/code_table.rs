//! Canonical code assignment and the matching decode structure.
//!
//! Only code lengths travel in the container header. Both sides rebuild the
//! same bit patterns from them: symbols are sorted by (length, value) and
//! numbered upward from zero, shifting left whenever the length grows.

use std::collections::BTreeMap;

use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffmanTree, MAX_CODE_LENGTH};

/// A code word: the low `length` bits of `bits`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub bits: u32,
    pub length: u8,
}

impl Code {
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.length <= other.length && other.bits >> (other.length - self.length) == self.bits
    }
}

/// Symbol -> code mapping used for encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Codes taken directly from the tree's root-to-leaf paths.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let codes = tree
            .generate_table()
            .into_iter()
            .map(|(byte, (bits, length))| (byte, Code { bits, length }))
            .collect();
        CodeTable { codes }
    }

    /// Canonical codes with the same lengths as the tree's paths.
    pub fn canonical_from_tree(tree: &HuffmanTree) -> Result<Self> {
        let lengths: Vec<(u8, u8)> = tree.code_lengths().into_iter().collect();
        CodeTable::canonical(&lengths)
    }

    /// Rebuild canonical codes from (symbol, length) pairs.
    ///
    /// Fails if a length is outside `1..=MAX_CODE_LENGTH`, a symbol repeats,
    /// or the lengths cannot form a prefix code.
    pub fn canonical(lengths: &[(u8, u8)]) -> Result<Self> {
        let mut sorted = lengths.to_vec();
        sorted.sort_by_key(|&(symbol, length)| (length, symbol));

        let mut codes = BTreeMap::new();
        let mut code: u64 = 0;
        let mut prev_length = 0u8;
        for (i, &(symbol, length)) in sorted.iter().enumerate() {
            if length == 0 || length > MAX_CODE_LENGTH {
                return Err(HuffmanError::format(format!(
                    "code length {length} for symbol 0x{symbol:02x} outside 1..={MAX_CODE_LENGTH}"
                )));
            }
            if i > 0 {
                code += 1;
            }
            code <<= length - prev_length;
            prev_length = length;

            if code >> length != 0 {
                return Err(HuffmanError::format(
                    "code lengths oversubscribe the code space",
                ));
            }
            let entry = Code {
                bits: code as u32,
                length,
            };
            if codes.insert(symbol, entry).is_some() {
                return Err(HuffmanError::format(format!(
                    "symbol 0x{symbol:02x} listed twice"
                )));
            }
        }
        Ok(CodeTable { codes })
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, length) pairs in ascending symbol order, as stored in the header.
    pub fn lengths(&self) -> Vec<(u8, u8)> {
        self.codes
            .iter()
            .map(|(&symbol, code)| (symbol, code.length))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes.iter().map(|(&symbol, &code)| (symbol, code))
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.codes.values().copied().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeNode {
    Branch([Option<u32>; 2]),
    Leaf(u8),
}

/// Binary trie rebuilt from a [`CodeTable`]. Bit 0 goes left, 1 goes right.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    nodes: Vec<DecodeNode>,
}

/// Result of feeding one bit to a [`DecodeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Symbol(u8),
    Continue(u32),
}

impl DecodeTable {
    pub const ROOT: u32 = 0;

    pub fn from_code_table(table: &CodeTable) -> Result<Self> {
        let mut nodes = vec![DecodeNode::Branch([None, None])];

        for (symbol, code) in table.iter() {
            let mut current = Self::ROOT as usize;
            for depth in (0..code.length).rev() {
                let bit = ((code.bits >> depth) & 1) as usize;
                let next_id = nodes.len() as u32;
                let is_last = depth == 0;

                let DecodeNode::Branch(children) = &mut nodes[current] else {
                    return Err(HuffmanError::format(format!(
                        "code for symbol 0x{symbol:02x} extends another code"
                    )));
                };
                let slot = children[bit];
                match slot {
                    Some(_) if is_last => {
                        return Err(HuffmanError::format(format!(
                            "code for symbol 0x{symbol:02x} collides with another code"
                        )));
                    }
                    Some(child) => current = child as usize,
                    None => {
                        children[bit] = Some(next_id);
                        nodes.push(if is_last {
                            DecodeNode::Leaf(symbol)
                        } else {
                            DecodeNode::Branch([None, None])
                        });
                        current = next_id as usize;
                    }
                }
            }
        }
        Ok(DecodeTable { nodes })
    }

    /// Follow one bit from `node`.
    pub fn step(&self, node: u32, bit: bool) -> Result<Step> {
        let children = match self.node(node)? {
            DecodeNode::Branch(children) => children,
            DecodeNode::Leaf(_) => {
                return Err(HuffmanError::format("decode walk started on a leaf"))
            }
        };
        let child = children[bit as usize]
            .ok_or_else(|| HuffmanError::format("bit sequence matches no code"))?;
        Ok(match self.node(child)? {
            DecodeNode::Leaf(symbol) => Step::Symbol(symbol),
            DecodeNode::Branch(_) => Step::Continue(child),
        })
    }

    fn node(&self, id: u32) -> Result<DecodeNode> {
        self.nodes
            .get(id as usize)
            .copied()
            .ok_or_else(|| HuffmanError::format(format!("no decode node {id}")))
    }
}
