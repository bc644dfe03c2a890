//! # huffpack
//!
//! Static Huffman compression of whole files into a self-describing
//! container: a frequency header followed by the packed bitstream.
//!
//! ## Quick Start
//!
//! ```rust
//! let container = huffpack::encode(b"aaaabbc")?;
//! assert_eq!(huffpack::decode(&container)?, b"aaaabbc");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! Files are handled by [`HuffmanCodec::encode_file`] and
//! [`HuffmanCodec::decode_file`]:
//!
//! ```rust,no_run
//! use huffpack::{CodecConfig, HuffmanCodec};
//! use std::path::Path;
//!
//! let config = CodecConfig::default();
//! let (input, encoded) = (Path::new("input.txt"), Path::new("input.txt.huff"));
//! HuffmanCodec::encode_file(input, encoded, &config)?;
//! HuffmanCodec::decode_file(encoded, Path::new("input_decoded.bin"), &config)?;
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bitstream;
pub mod code_table;
pub mod config;
pub mod container;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use code_table::CodeTable;
pub use config::CodecConfig;
pub use error::{HeaderFault, HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{DecodeSummary, Decoded, EncodeSummary, HuffmanCodec};
pub use hufftree::HuffmanTree;

/// Encodes `input` into a container.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::encode_bytes(input)
}

/// Decodes a container.
///
/// A payload that ends early yields the symbols decoded so far and logs
/// a warning; use [`HuffmanCodec::decode_bytes`] with a strict
/// [`CodecConfig`] to treat that as an error.
pub fn decode(container: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::decode_bytes(container, &CodecConfig::default()).map(|decoded| decoded.bytes)
}

/// The code table an encoder would use for `frequencies`.
pub fn dictionary(frequencies: &FrequencyTable) -> CodeTable {
    CodeTable::from_frequencies(frequencies)
}
