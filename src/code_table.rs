use std::collections::BTreeMap;
use std::fmt;

use bitvec::prelude::*;

use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// One symbol's code, first bit to emit at index 0.
pub type Code = BitVec<u8, Msb0>;

/// Symbol to code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walks the tree depth-first with an explicit stack, left edge `0`,
    /// right edge `1`, and records the path at every leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(usize, Code)> = vec![(tree.root(), Code::new())];

        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                HuffNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path);
                }
                HuffNode::Internal { children, .. } => {
                    for (bit, child) in children.iter().enumerate().rev() {
                        if let Some(child) = child {
                            let mut next = path.clone();
                            next.push(bit == 1);
                            stack.push((*child, next));
                        }
                    }
                }
            }
        }

        CodeTable { codes }
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        HuffmanTree::build(frequencies)
            .map(|tree| Self::from_tree(&tree))
            .unwrap_or_default()
    }

    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> {
        self.codes.iter().map(|(&s, c)| (s, c.as_bitslice()))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Payload size in bits when packing data with these counts.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| self.codes.get(&symbol).map(|c| c.len() as u64 * count))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a.as_bitslice()))
        })
    }

    /// Renders the code table next to the counts it was built from.
    pub fn dictionary<'a>(&'a self, frequencies: &'a FrequencyTable) -> Dictionary<'a> {
        Dictionary { table: self, frequencies }
    }
}

/// Formats a code as a string of `0` and `1`.
pub fn code_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter().by_vals().map(|bit| if bit { '1' } else { '0' }).collect()
}

/// Printable translation dictionary, one symbol per line.
pub struct Dictionary<'a> {
    table: &'a CodeTable,
    frequencies: &'a FrequencyTable,
}

impl fmt::Display for Dictionary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Translation Dictionary ===")?;
        let mut printed = 0;
        for (symbol, code) in self.table.iter() {
            let count = self.frequencies.get(symbol);
            if count == 0 {
                continue;
            }
            printed += 1;
            let code = code_string(code);
            if symbol.is_ascii_graphic() || symbol == b' ' {
                writeln!(
                    f,
                    "'{}' (code {:3}): {:<20} (freq: {})",
                    symbol as char, symbol, code, count
                )?;
            } else {
                writeln!(f, "code {:3}: {:<20} (freq: {})", symbol, code, count)?;
            }
        }
        if printed == 0 {
            writeln!(f, "(no symbols)")
        } else {
            writeln!(f, "Total: {} unique symbols", printed)
        }
    }
}
