//! Deterministic Huffman tree construction
//!
//! The tree is stored as a flat node table: leaves occupy ids `0..L` in
//! descending-count order (ties keep first-seen order), internal nodes are
//! appended in creation order, and the root is always the last entry. The
//! merge order below is load-bearing: it decides the serialized bytes of
//! every archive, so equal-weight handling must not be "improved".

use std::cell::OnceCell;

use crate::codes::CodeTable;
use crate::error::{Error, Result};
use crate::freq::FrequencyTable;

/// One entry of the node table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Terminal node carrying a source byte value
    Leaf(u8),
    /// Fork with the child taken on a 0 bit and the child taken on a 1 bit
    Internal { zero: u16, one: u16 },
}

/// Binary prefix-code tree over byte values
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    codes: OnceCell<CodeTable>,
}

impl Tree {
    /// Build the tree for a frequency table.
    ///
    /// Leaves are seeded in descending-count order (stable, so equal counts
    /// keep first-seen order). The two lightest pending nodes are merged
    /// repeatedly; the merged node re-enters the pending list at the front
    /// when its weight is at least the current head's, otherwise before the
    /// first strictly lighter entry.
    #[must_use]
    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let mut entries: Vec<(u8, u64)> = freq.pairs().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let mut nodes: Vec<Node> = entries.iter().map(|&(byte, _)| Node::Leaf(byte)).collect();
        let mut pending: Vec<(u16, u64)> = entries
            .iter()
            .enumerate()
            .map(|(id, &(_, count))| (id as u16, count))
            .collect();

        while pending.len() > 1 {
            let (one, one_weight) = pending.pop().unwrap_or_default();
            let (zero, zero_weight) = pending.pop().unwrap_or_default();
            let merged = (nodes.len() as u16, zero_weight + one_weight);
            nodes.push(Node::Internal { zero, one });
            insert_pending(&mut pending, merged);
        }

        debug_assert!(nodes.len() <= u16::MAX as usize);
        Self {
            nodes,
            codes: OnceCell::new(),
        }
    }

    /// Rebuild a tree from the `(field A, field B)` pairs stored in an
    /// archive header.
    ///
    /// A pair whose second field equals its own index is a leaf; anything
    /// else is an internal node whose children must already exist. Rejects
    /// tables no encoder could have produced.
    pub fn from_node_table(entries: &[(u16, u16)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyNodeTable);
        }

        let mut nodes = Vec::with_capacity(entries.len());
        for (index, &(a, b)) in entries.iter().enumerate() {
            if b as usize == index {
                if a > u16::from(u8::MAX) {
                    return Err(Error::LeafValueOutOfRange { index, value: a });
                }
                nodes.push(Node::Leaf(a as u8));
            } else {
                for child in [a, b] {
                    if child as usize >= index {
                        return Err(Error::ChildOutOfOrder { index, child });
                    }
                }
                nodes.push(Node::Internal { zero: a, one: b });
            }
        }

        if matches!(nodes[nodes.len() - 1], Node::Leaf(_)) {
            return Err(Error::RootIsLeaf);
        }
        Ok(Self {
            nodes,
            codes: OnceCell::new(),
        })
    }

    /// Number of nodes in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least one node
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the root node (always the last entry)
    #[must_use]
    pub fn root_id(&self) -> u16 {
        (self.nodes.len() - 1) as u16
    }

    /// Node stored at `id`
    #[must_use]
    pub fn node(&self, id: u16) -> &Node {
        &self.nodes[id as usize]
    }

    /// Follow `bit` from an internal node; `None` if `from` is a leaf
    #[must_use]
    pub fn step(&self, from: u16, bit: u8) -> Option<u16> {
        match self.nodes[from as usize] {
            Node::Internal { zero, one } => Some(if bit == 0 { zero } else { one }),
            Node::Leaf(_) => None,
        }
    }

    /// The code table for this tree, derived on first use and cached
    pub fn codes(&self) -> &CodeTable {
        self.codes.get_or_init(|| CodeTable::derive(self))
    }

    /// `(field A, field B)` pairs exactly as serialized into an archive
    pub fn node_table(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.nodes.iter().enumerate().map(|(id, node)| match *node {
            Node::Leaf(value) => (u16::from(value), id as u16),
            Node::Internal { zero, one } => (zero, one),
        })
    }
}

/// Place a merged node into the descending pending list.
///
/// Weight at least the head's goes to the front, ahead of equal weights;
/// otherwise the node lands before the first strictly lighter entry, after
/// any equal run further down. Both halves match the reference placement
/// byte-for-byte.
fn insert_pending(pending: &mut Vec<(u16, u64)>, node: (u16, u64)) {
    if pending.is_empty() || pending[0].1 <= node.1 {
        pending.insert(0, node);
        return;
    }
    let at = pending.partition_point(|entry| entry.1 >= node.1);
    pending.insert(at, node);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_of(tree: &Tree) -> Vec<(u16, u16)> {
        tree.node_table().collect()
    }

    #[test]
    fn test_four_equal_counts_merge_order() {
        // Four symbols with count 1 each: the merge order is fully decided
        // by tie-break rules, so the node table is pinned exactly.
        let freq = FrequencyTable::from_pairs(&[(65, 1), (66, 1), (67, 1), (68, 1)]);
        let tree = Tree::from_frequencies(&freq);
        assert_eq!(
            table_of(&tree),
            vec![(65, 0), (66, 1), (67, 2), (68, 3), (2, 3), (0, 1), (5, 4)]
        );
        assert_eq!(tree.root_id(), 6);
    }

    #[test]
    fn test_mixed_weights_merge_order() {
        // Head-equal inserts go to the front, mid-list equal weights are
        // passed over: both paths exercised by this weight profile.
        let freq =
            FrequencyTable::from_pairs(&[(97, 5), (98, 2), (99, 2), (100, 1), (101, 1)]);
        let tree = Tree::from_frequencies(&freq);
        assert_eq!(
            table_of(&tree),
            vec![
                (97, 0),
                (98, 1),
                (99, 2),
                (100, 3),
                (101, 4),
                (3, 4),
                (2, 5),
                (6, 1),
                (7, 0)
            ]
        );
    }

    #[test]
    fn test_degenerate_two_leaf_tree() {
        let freq = FrequencyTable::from_pairs(&[(7, 40)]);
        let tree = Tree::from_frequencies(&freq);
        assert_eq!(table_of(&tree), vec![(7, 0), (8, 1), (0, 1)]);
    }

    #[test]
    fn test_stable_sort_keeps_first_seen_order() {
        let freq = FrequencyTable::from_pairs(&[(50, 3), (10, 9), (40, 3)]);
        let tree = Tree::from_frequencies(&freq);
        // 10 outweighs both; 50 and 40 tie and keep scan order.
        assert_eq!(table_of(&tree)[..3], [(10, 0), (50, 1), (40, 2)]);
    }

    #[test]
    fn test_round_trip_through_node_table() {
        let freq = FrequencyTable::from_pairs(&[(1, 10), (2, 7), (3, 2), (4, 1)]);
        let tree = Tree::from_frequencies(&freq);
        let stored: Vec<_> = tree.node_table().collect();

        let rebuilt = Tree::from_node_table(&stored).expect("stored table is valid");
        assert_eq!(table_of(&rebuilt), stored);
        assert_eq!(rebuilt.root_id(), tree.root_id());
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            Tree::from_node_table(&[]),
            Err(Error::EmptyNodeTable)
        ));
    }

    #[test]
    fn test_rejects_leaf_root() {
        let result = Tree::from_node_table(&[(65, 0)]);
        assert!(matches!(result, Err(Error::RootIsLeaf)));
    }

    #[test]
    fn test_rejects_forward_child() {
        // Node 2 claims node 3 as a child, but node 3 does not exist yet.
        let result = Tree::from_node_table(&[(65, 0), (66, 1), (0, 3)]);
        assert!(matches!(
            result,
            Err(Error::ChildOutOfOrder { index: 2, child: 3 })
        ));
    }

    #[test]
    fn test_rejects_wide_leaf_value() {
        let result = Tree::from_node_table(&[(300, 0), (66, 1), (0, 1)]);
        assert!(matches!(
            result,
            Err(Error::LeafValueOutOfRange { index: 0, value: 300 })
        ));
    }

    #[test]
    fn test_step() {
        let freq = FrequencyTable::from_pairs(&[(7, 40)]);
        let tree = Tree::from_frequencies(&freq);
        let root = tree.root_id();
        assert_eq!(tree.step(root, 0), Some(0));
        assert_eq!(tree.step(root, 1), Some(1));
        assert_eq!(tree.step(0, 0), None);
    }
}
