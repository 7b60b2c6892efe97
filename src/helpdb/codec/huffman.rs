//! Huffman tree over byte symbols.
//!
//! # Serialized form
//! ```text
//! [2 bytes] node value (little-endian i16), repeated
//! [2 bytes] 0x0000 terminator
//! ```
//! Node `i` with a negative value is a leaf whose symbol is the low byte.
//! A non-negative value `v` is an internal node: bit 0 leads to node `v / 2`,
//! bit 1 leads to node `i + 1`, and `i + 1 < v / 2 < n` must hold.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;

use super::bitstream::BitReader;
use super::ByteSource;
use crate::helpdb::types::error::{HelpError, Result};

/// Largest node count of a proper binary tree with 256 leaves.
const MAX_NODES: usize = 511;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HuffmanNode {
    Leaf(u8),
    Internal {
        zero: Box<HuffmanNode>,
        one: Box<HuffmanNode>,
    },
}

/// A proper binary tree encoding a subset of the byte values.
///
/// An empty tree encodes nothing and fails to decode. A singular tree (a
/// lone leaf) yields its symbol without reading any bits, so callers must
/// bound the number of symbols they ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffmanNode>,
    symbol_count: usize,
}

impl HuffmanTree {
    /// Reads node values up to and including the zero terminator.
    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self> {
        let mut values = Vec::new();
        loop {
            let value = reader.read_i16::<LittleEndian>().map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    HelpError::InvalidHuffmanTree("missing terminating zero".to_string())
                } else {
                    e.into()
                }
            })?;
            if value == 0 {
                break;
            }
            if values.len() == MAX_NODES {
                return Err(HelpError::InvalidHuffmanTree(format!(
                    "more than {} nodes",
                    MAX_NODES
                )));
            }
            values.push(value);
        }
        trace!("Huffman tree: {} node values", values.len());
        Self::from_node_values(&values)
    }

    /// Builds a tree from node values without the terminator.
    pub fn from_node_values(values: &[i16]) -> Result<Self> {
        let n = values.len();
        if n == 0 {
            return Ok(Self::default());
        }
        if n % 2 == 0 {
            return Err(HelpError::InvalidHuffmanTree(format!(
                "expecting an odd number of nodes, found {}",
                n
            )));
        }

        let mut builder = TreeBuilder {
            values,
            visited: vec![false; n],
            symbols: [false; 256],
        };
        let root = builder.build(0)?;
        if let Some(orphan) = builder.visited.iter().position(|v| !v) {
            return Err(HelpError::InvalidHuffmanTree(format!(
                "node {} is not reachable from the root",
                orphan
            )));
        }

        Ok(Self {
            root: Some(root),
            symbol_count: n / 2 + 1,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn is_singular(&self) -> bool {
        matches!(self.root, Some(HuffmanNode::Leaf(_)))
    }

    /// Number of distinct symbols encoded by the tree.
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Decodes one symbol, or returns `None` if the bits run out first.
    pub fn decode<R: Read>(&self, bits: &mut BitReader<R>) -> Result<Option<u8>> {
        let mut node = self.root.as_ref().ok_or(HelpError::EmptyHuffmanTree)?;
        loop {
            match node {
                HuffmanNode::Leaf(symbol) => return Ok(Some(*symbol)),
                HuffmanNode::Internal { zero, one } => {
                    node = match bits.read_bit()? {
                        Some(false) => zero.as_ref(),
                        Some(true) => one.as_ref(),
                        None => return Ok(None),
                    };
                }
            }
        }
    }
}

struct TreeBuilder<'a> {
    values: &'a [i16],
    visited: Vec<bool>,
    symbols: [bool; 256],
}

impl TreeBuilder<'_> {
    fn build(&mut self, index: usize) -> Result<HuffmanNode> {
        if self.visited[index] {
            return Err(HelpError::InvalidHuffmanTree(format!(
                "node {} is referenced twice",
                index
            )));
        }
        self.visited[index] = true;

        let value = self.values[index];
        if value < 0 {
            let symbol = (value & 0xFF) as u8;
            if self.symbols[symbol as usize] {
                return Err(HelpError::InvalidHuffmanTree(format!(
                    "symbol {:#04x} is encoded twice",
                    symbol
                )));
            }
            self.symbols[symbol as usize] = true;
            return Ok(HuffmanNode::Leaf(symbol));
        }

        let zero = value as usize / 2;
        let one = index + 1;
        if !(one < zero && zero < self.values.len()) {
            return Err(HelpError::InvalidHuffmanTree(format!(
                "node {} has invalid children {} and {}",
                index, zero, one
            )));
        }
        let one = self.build(one)?;
        let zero = self.build(zero)?;
        Ok(HuffmanNode::Internal {
            zero: Box::new(zero),
            one: Box::new(one),
        })
    }
}

/// Byte source that decodes symbols from a compressed bit stream.
pub struct HuffmanDecoder<'t, R> {
    tree: &'t HuffmanTree,
    bits: BitReader<R>,
}

impl<'t, R: Read> HuffmanDecoder<'t, R> {
    pub fn new(tree: &'t HuffmanTree, inner: R) -> Self {
        Self {
            tree,
            bits: BitReader::new(inner),
        }
    }
}

impl<R: Read> ByteSource for HuffmanDecoder<'_, R> {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        self.tree.decode(&mut self.bits)
    }
}
