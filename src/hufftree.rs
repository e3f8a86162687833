use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Longest code the tree builder will hand out. Every code fits in a `u32`.
pub const MAX_CODE_LENGTH: u8 = 32;

/// Index of a node inside a [`HuffmanTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }
}

/// Priority queue entry. Ordered by weight, then rank: a leaf ranks by its
/// byte value, an internal node by 256 plus its creation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: u64,
    rank: u32,
    node: NodeId,
}

/// Huffman tree stored as an arena; children are referenced by index.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for `bytes`, or `None` when the input is empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Option<Self>> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Build a tree whose depth does not exceed [`MAX_CODE_LENGTH`].
    ///
    /// If the optimal tree is deeper, counts are halved and the tree rebuilt
    /// until it fits.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Option<Self>> {
        if frequencies.is_empty() {
            return Ok(None);
        }
        debug!(
            unique_symbols = frequencies.len(),
            total = frequencies.total(),
            "building huffman tree"
        );

        let mut frequencies = frequencies.clone();
        loop {
            let tree = HuffmanTree::build_optimal(&frequencies)?;
            let depth = tree.max_depth();
            if depth <= MAX_CODE_LENGTH as usize {
                return Ok(Some(tree));
            }
            debug!(depth, "tree exceeds maximum code length, flattening counts");
            frequencies = frequencies.flattened();
        }
    }

    fn build_optimal(frequencies: &FrequencyTable) -> Result<Self> {
        let mut nodes = Vec::with_capacity(frequencies.len() * 2);
        let mut entries = Vec::with_capacity(frequencies.len());
        for (byte, weight) in frequencies.iter() {
            entries.push(HeapEntry {
                weight,
                rank: byte as u32,
                node: nodes.len(),
            });
            nodes.push(HuffNode::Leaf { weight, byte });
        }

        let mut heap = MinHeap::build(entries)?;
        let mut next_rank = 256u32;
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            let weight = x.weight + y.weight;
            let node = nodes.len();
            nodes.push(HuffNode::Internal {
                weight,
                left: x.node,
                right: y.node,
            });
            heap.insert(HeapEntry {
                weight,
                rank: next_rank,
                node,
            });
            next_rank += 1;
        }

        let root = heap.extract_min()?.node;
        Ok(HuffmanTree { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id]
    }

    /// Number of distinct symbols (leaves).
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, HuffNode::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf. A lone leaf counts as depth 1.
    pub fn max_depth(&self) -> usize {
        self.code_lengths()
            .values()
            .map(|&len| len as usize)
            .max()
            .unwrap_or(0)
    }

    /// Root-to-leaf paths: left appends 0, right appends 1, first bit is the
    /// most significant. Returns byte -> (code, bit length).
    ///
    /// A tree with a single leaf gives that leaf the one-bit code `0`.
    pub fn generate_table(&self) -> BTreeMap<u8, (u32, u8)> {
        let mut table = BTreeMap::new();
        if let HuffNode::Leaf { byte, .. } = self.nodes[self.root] {
            table.insert(byte, (0, 1));
            return table;
        }

        let mut stack = vec![(self.root, 0u64, 0usize)];
        while let Some((id, code, depth)) = stack.pop() {
            match self.nodes[id] {
                HuffNode::Leaf { byte, .. } => {
                    table.insert(byte, (code as u32, depth as u8));
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right, (code << 1) | 1, depth + 1));
                    stack.push((left, code << 1, depth + 1));
                }
            }
        }
        table
    }

    /// Depth of each leaf, keyed by byte value.
    pub fn code_lengths(&self) -> BTreeMap<u8, u8> {
        let mut lengths = BTreeMap::new();
        if let HuffNode::Leaf { byte, .. } = self.nodes[self.root] {
            lengths.insert(byte, 1);
            return lengths;
        }

        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                HuffNode::Leaf { byte, .. } => {
                    lengths.insert(byte, depth.min(u8::MAX as usize) as u8);
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        trace!(tree = %self, "computed code lengths");
        lengths
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self.nodes[id] {
            HuffNode::Leaf { byte, weight } => {
                writeln!(f, "{indent}{label}-> Leaf: 0x{byte:02x} [weight: {weight}]")
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{indent}{label}-> Internal [weight: {weight}]")?;
                self.fmt_node(f, left, depth + 1, "L")?;
                self.fmt_node(f, right, depth + 1, "R")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0, "root")
    }
}
