use tracing::debug;

use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Index of a node inside a [`HuffmanTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    /// `children[0]` is the left (bit 0) branch, `children[1]` the right.
    /// Only the single-symbol tree leaves a branch empty.
    Internal {
        weight: u64,
        children: [Option<NodeId>; 2],
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Working-set entry. Ordered by weight, then rank.
///
/// Leaves rank by symbol value. Every merged node gets a rank below all
/// ranks handed out so far, so it wins ties against the nodes already
/// waiting. Encoder and decoder build the same tree from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: u64,
    rank: i32,
    node: NodeId,
}

/// Huffman tree stored as an arena of nodes.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
    leaves: usize,
}

impl HuffmanTree {
    /// Builds the tree for every symbol with a nonzero count.
    ///
    /// Returns `None` when the table is empty.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let leaves = frequencies.unique_symbols();
        if leaves == 0 {
            return None;
        }

        let mut nodes = Vec::with_capacity(2 * leaves);
        let mut entries = Vec::with_capacity(leaves);
        for (symbol, weight) in frequencies.iter() {
            entries.push(HeapEntry {
                weight,
                rank: symbol as i32,
                node: nodes.len(),
            });
            nodes.push(HuffNode::Leaf { weight, symbol });
        }

        if leaves == 1 {
            let weight = nodes[0].weight();
            nodes.push(HuffNode::Internal {
                weight,
                children: [Some(0), None],
            });
            debug!(leaves, "built single-symbol tree");
            return Some(HuffmanTree { root: 1, nodes, leaves });
        }

        let mut heap = MinHeap::build(entries);
        let mut next_rank = -1;
        while heap.heap_size() > 1 {
            let (Some(x), Some(y)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            let merged = Self::merge(&mut nodes, x, y);
            heap.insert(HeapEntry {
                weight: merged.1,
                rank: next_rank,
                node: merged.0,
            });
            next_rank -= 1;
        }

        let root = heap.extract_min()?.node;
        let tree = HuffmanTree { nodes, root, leaves };
        debug!(leaves, nodes = tree.nodes.len(), depth = tree.depth(), "built huffman tree");
        Some(tree)
    }

    // x is the smaller entry and becomes the left child.
    fn merge(nodes: &mut Vec<HuffNode>, x: HeapEntry, y: HeapEntry) -> (NodeId, u64) {
        let weight = x.weight + y.weight;
        nodes.push(HuffNode::Internal {
            weight,
            children: [Some(x.node), Some(y.node)],
        });
        (nodes.len() - 1, weight)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id]
    }

    /// Follows one edge from `id`; `None` if `id` is a leaf or the branch is empty.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match &self.nodes[id] {
            HuffNode::Internal { children, .. } => children[bit as usize],
            HuffNode::Leaf { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match &self.nodes[id] {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { children, .. } => {
                    stack.extend(children.iter().flatten().map(|&c| (c, depth + 1)));
                }
            }
        }
        deepest
    }
}
