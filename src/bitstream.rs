//! MSB-first packing of codes into bytes, and the tree walk that undoes it.

use std::io::Write;

use bitvec::prelude::*;

use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree, NodeId};

/// Totals reported once packing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackSummary {
    pub symbols: u64,
    pub bits: u64,
    pub bytes: u64,
}

/// Appends codes to a bit buffer and writes out whole bytes as it fills.
pub struct BitPacker<'t, W: Write> {
    table: &'t CodeTable,
    sink: W,
    pending: BitVec<u8, Msb0>,
    flush_bits: usize,
    summary: PackSummary,
}

impl<'t, W: Write> BitPacker<'t, W> {
    pub fn new(table: &'t CodeTable, sink: W, buffer_size: usize) -> Self {
        let flush_bits = buffer_size.max(1) * 8;
        BitPacker {
            table,
            sink,
            pending: BitVec::with_capacity(flush_bits + 256),
            flush_bits,
            summary: PackSummary::default(),
        }
    }

    pub fn pack(&mut self, data: &[u8]) -> Result<()> {
        for &symbol in data {
            let code = self.table.get(symbol).ok_or(HuffmanError::MissingCode {
                symbol,
                offset: self.summary.symbols,
            })?;
            self.pending.extend_from_bitslice(code);
            self.summary.symbols += 1;
            self.summary.bits += code.len() as u64;

            if self.pending.len() >= self.flush_bits {
                self.flush_whole_bytes()?;
            }
        }
        Ok(())
    }

    pub fn symbols(&self) -> u64 {
        self.summary.symbols
    }

    fn flush_whole_bytes(&mut self) -> Result<()> {
        let whole = self.pending.len() / 8;
        if whole == 0 {
            return Ok(());
        }
        self.sink.write_all(&self.pending.as_raw_slice()[..whole])?;
        self.summary.bytes += whole as u64;
        let tail = self.pending[whole * 8..].to_bitvec();
        self.pending = tail;
        Ok(())
    }

    /// Zero-fills the last partial byte, writes it and hands back the sink.
    pub fn finish(mut self) -> Result<(PackSummary, W)> {
        while self.pending.len() % 8 != 0 {
            self.pending.push(false);
        }
        self.flush_whole_bytes()?;
        self.sink.flush()?;
        Ok((self.summary, self.sink))
    }
}

/// Outcome of walking a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackSummary {
    pub expected: u64,
    pub decoded: u64,
    /// Bits left unread after the last expected symbol, padding included.
    pub trailing_bits: u64,
}

impl UnpackSummary {
    pub fn is_complete(&self) -> bool {
        self.decoded == self.expected
    }
}

/// Walks a tree one payload bit at a time, emitting a symbol per leaf.
///
/// Payload may be fed in chunks; the cursor carries over between them.
/// Bits past the expected symbol count are never walked.
pub struct BitUnpacker<'t> {
    tree: &'t HuffmanTree,
    cursor: NodeId,
    expected: u64,
    decoded: u64,
    bit_offset: u64,
    trailing_bits: u64,
}

impl<'t> BitUnpacker<'t> {
    pub fn new(tree: &'t HuffmanTree, expected: u64) -> Self {
        BitUnpacker {
            tree,
            cursor: tree.root(),
            expected,
            decoded: 0,
            bit_offset: 0,
            trailing_bits: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.decoded >= self.expected
    }

    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Decodes as much of `chunk` as needed, appending symbols to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let bits = chunk.view_bits::<Msb0>();
        for (i, bit) in bits.iter().by_vals().enumerate() {
            if self.is_done() {
                self.trailing_bits += (bits.len() - i) as u64;
                return Ok(());
            }

            self.cursor = self
                .tree
                .child(self.cursor, bit)
                .ok_or(HuffmanError::InvalidCode { bit_offset: self.bit_offset })?;
            self.bit_offset += 1;

            if let HuffNode::Leaf { symbol, .. } = self.tree.node(self.cursor) {
                out.push(*symbol);
                self.decoded += 1;
                self.cursor = self.tree.root();
            }
        }
        Ok(())
    }

    pub fn finish(self) -> UnpackSummary {
        UnpackSummary {
            expected: self.expected,
            decoded: self.decoded,
            trailing_bits: self.trailing_bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn pack_all(data: &[u8], buffer_size: usize) -> (PackSummary, Vec<u8>) {
        let table = CodeTable::from_frequencies(&FrequencyTable::from_bytes(data));
        let mut packer = BitPacker::new(&table, Vec::new(), buffer_size);
        packer.pack(data).unwrap();
        packer.finish().unwrap()
    }

    #[test]
    fn test_msb_first_with_zero_padding() {
        // a=1 b=01 c=00 -> 1111 0101 00(000000)
        let (summary, bytes) = pack_all(b"aaaabbc", 64);
        assert_eq!(bytes, vec![0b1111_0101, 0b0000_0000]);
        assert_eq!(summary, PackSummary { symbols: 7, bits: 10, bytes: 2 });
    }

    #[test]
    fn test_flushes_match_single_write() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 31 + (i % 7) * 3) as u8).collect();
        let (_, small) = pack_all(&data, 1);
        let (_, large) = pack_all(&data, 1 << 16);
        assert_eq!(small, large);
    }

    #[test]
    fn test_missing_code_reports_offset() {
        let table = CodeTable::from_frequencies(&FrequencyTable::from_bytes(b"ab"));
        let mut packer = BitPacker::new(&table, Vec::new(), 16);
        let err = packer.pack(b"abba!").unwrap_err();
        assert!(matches!(err, HuffmanError::MissingCode { symbol: b'!', offset: 4 }));
    }

    #[test]
    fn test_unpack_ignores_padding() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaaabbc")).unwrap();
        let mut unpacker = BitUnpacker::new(&tree, 7);
        let mut out = Vec::new();
        // padding set to ones would decode as extra 'a's if walked
        unpacker.feed(&[0b1111_0101, 0b0011_1111], &mut out).unwrap();
        assert_eq!(out, b"aaaabbc");
        let summary = unpacker.finish();
        assert!(summary.is_complete());
        assert_eq!(summary.trailing_bits, 6);
    }

    #[test]
    fn test_unpack_across_chunks() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let (_, packed) = pack_all(data, 8);
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        let mut unpacker = BitUnpacker::new(&tree, data.len() as u64);
        let mut out = Vec::new();
        for byte in &packed {
            unpacker.feed(std::slice::from_ref(byte), &mut out).unwrap();
        }
        assert_eq!(out, data);
        assert!(unpacker.is_done());
    }

    #[test]
    fn test_short_payload_is_partial() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaaabbc")).unwrap();
        let mut unpacker = BitUnpacker::new(&tree, 7);
        let mut out = Vec::new();
        unpacker.feed(&[0b1111_0101], &mut out).unwrap();
        assert_eq!(out, b"aaaab");
        let summary = unpacker.finish();
        assert!(!summary.is_complete());
        assert_eq!(summary.decoded, 5);
    }

    #[test]
    fn test_single_symbol_tree_rejects_one_bits() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"xx")).unwrap();
        let mut unpacker = BitUnpacker::new(&tree, 2);
        let mut out = Vec::new();
        let err = unpacker.feed(&[0b0100_0000], &mut out).unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidCode { bit_offset: 1 }));
        assert_eq!(out, b"x");
    }
}
