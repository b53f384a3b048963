//! Bit-code derivation
//!
//! Walks a [`Tree`] depth-first and records, for every leaf byte, the bit
//! path from the root: 0 for a bit-0 edge, 1 for a bit-1 edge. Depth is
//! bounded by the distinct symbol count (at most 256 levels), so plain
//! recursion is safe.

use crate::tree::{Node, Tree};

/// Byte-to-bit-string mapping derived from one tree.
///
/// Bits are stored as `0`/`1` byte values, most significant bit of the code
/// first. Every code is at least one bit long because a tree always has two
/// or more leaves.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Vec<u8>>>,
}

impl CodeTable {
    /// Derive the table for `tree`
    #[must_use]
    pub fn derive(tree: &Tree) -> Self {
        let mut codes = vec![None; 256];
        let mut prefix = Vec::new();
        descend(tree, tree.root_id(), &mut prefix, &mut codes);
        Self { codes }
    }

    /// Code bits for `byte`, if the tree has a leaf for it
    #[must_use]
    pub fn code(&self, byte: u8) -> Option<&[u8]> {
        self.codes[byte as usize].as_deref()
    }

    /// Code length in bits for `byte`
    #[must_use]
    pub fn code_len(&self, byte: u8) -> Option<usize> {
        self.codes[byte as usize].as_ref().map(Vec::len)
    }
}

fn descend(tree: &Tree, id: u16, prefix: &mut Vec<u8>, codes: &mut [Option<Vec<u8>>]) {
    match *tree.node(id) {
        Node::Leaf(value) => {
            codes[value as usize] = Some(prefix.clone());
        }
        Node::Internal { zero, one } => {
            prefix.push(0);
            descend(tree, zero, prefix, codes);
            prefix.pop();
            prefix.push(1);
            descend(tree, one, prefix, codes);
            prefix.pop();
        }
    }
}
