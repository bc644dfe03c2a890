use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::bitstream::{BitPacker, BitUnpacker, UnpackSummary};
use crate::code_table::CodeTable;
use crate::config::CodecConfig;
use crate::container::{self, Header};
use crate::error::{HeaderFault, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;

/// Figures from one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_bytes: u64,
    pub header_bytes: u64,
    pub payload_bytes: u64,
    pub payload_bits: u64,
    pub unique_symbols: usize,
}

impl EncodeSummary {
    pub fn output_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }

    /// Output size over input size; `None` for empty input.
    pub fn compression_ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes() as f64 / self.input_bytes as f64)
    }

    /// Percentage of the input size saved, negative when the output grew.
    pub fn space_saving(&self) -> Option<f64> {
        self.compression_ratio().map(|ratio| (1.0 - ratio) * 100.0)
    }
}

/// Figures from one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub unique_symbols: usize,
    pub expected_symbols: u64,
    pub decoded_symbols: u64,
    pub trailing_bits: u64,
}

impl DecodeSummary {
    fn new(header: &Header, unpacked: UnpackSummary) -> Self {
        DecodeSummary {
            unique_symbols: header.frequencies.unique_symbols(),
            expected_symbols: unpacked.expected,
            decoded_symbols: unpacked.decoded,
            trailing_bits: unpacked.trailing_bits,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.decoded_symbols == self.expected_symbols
    }
}

/// Output of an in-memory decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    pub summary: DecodeSummary,
}

/// Encoder state for one frequency table: the tree, its codes and the
/// header they will be written under.
#[derive(Debug)]
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: Option<HuffmanTree>,
    table: CodeTable,
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(frequencies: FrequencyTable) -> Self {
        let tree = HuffmanTree::build(&frequencies);
        let table = tree.as_ref().map(CodeTable::from_tree).unwrap_or_default();
        debug!(
            symbols = table.len(),
            max_code_len = table.max_code_len(),
            "derived code table"
        );
        HuffmanCodec {
            frequencies,
            tree,
            table,
            config: CodecConfig::default(),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::new(FrequencyTable::from_bytes(data))
    }

    /// Counts the bytes of the file at `path`, reading `config.buffer_size`
    /// bytes at a time. The codec keeps `config`.
    pub fn from_file(path: &Path, config: &CodecConfig) -> Result<Self> {
        config.validate()?;
        let mut reader = BufReader::with_capacity(config.buffer_size, File::open(path)?);
        let frequencies = FrequencyTable::from_reader(&mut reader, config.buffer_size)?;
        Ok(Self::new(frequencies).with_config(*config))
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    /// Packs `data`, which must have exactly this codec's byte counts.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let capacity = container::Header::encoded_len(self.table.len())
            + (self.table.encoded_bits(&self.frequencies) / 8) as usize
            + 1;
        let mut input = data;
        let (_, out) = self.write_container(&mut input, Vec::with_capacity(capacity))?;
        Ok(out)
    }

    fn write_container<R: Read, W: Write>(
        &self,
        input: &mut R,
        mut output: W,
    ) -> Result<(EncodeSummary, W)> {
        self.config.validate()?;
        let header_bytes = container::write_header(&mut output, &self.frequencies)?;

        let mut packer = BitPacker::new(&self.table, output, self.config.buffer_size);
        let mut chunk = vec![0u8; self.config.buffer_size];
        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            packer.pack(&chunk[..n])?;
        }

        let expected = self.frequencies.total();
        if packer.symbols() != expected {
            return Err(HuffmanError::SymbolCountMismatch {
                expected,
                actual: packer.symbols(),
            });
        }

        let (packed, output) = packer.finish()?;
        let summary = EncodeSummary {
            input_bytes: packed.symbols,
            header_bytes: header_bytes as u64,
            payload_bytes: packed.bytes,
            payload_bits: packed.bits,
            unique_symbols: self.table.len(),
        };
        Ok((summary, output))
    }

    /// Encodes an in-memory buffer into a complete container.
    pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
        Self::from_bytes(data).encode(data)
    }

    /// Counts `input`, rewinds it, and writes the container to `output`.
    pub fn encode_stream<R, W>(
        mut input: R,
        output: W,
        config: &CodecConfig,
    ) -> Result<EncodeSummary>
    where
        R: Read + Seek,
        W: Write,
    {
        config.validate()?;
        let frequencies = FrequencyTable::from_reader(&mut input, config.buffer_size)?;
        input.seek(SeekFrom::Start(0))?;
        let codec = Self::new(frequencies).with_config(*config);
        let (summary, _) = codec.write_container(&mut input, output)?;
        Ok(summary)
    }

    pub fn encode_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<EncodeSummary> {
        config.validate()?;
        let reader = BufReader::with_capacity(config.buffer_size, File::open(input)?);
        let writer = BufWriter::with_capacity(config.buffer_size, File::create(output)?);
        let summary = Self::encode_stream(reader, writer, config)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            input_bytes = summary.input_bytes,
            output_bytes = summary.output_bytes(),
            bits = summary.payload_bits,
            "encoded file"
        );
        Ok(summary)
    }

    /// Decodes an in-memory container.
    pub fn decode_bytes(container: &[u8], config: &CodecConfig) -> Result<Decoded> {
        let (header, payload) = container::split(container)?;
        // Each symbol costs at least one bit, so the payload bounds the output.
        let reserve = header.symbol_total().min(payload.len() as u64 * 8);
        let mut bytes = Vec::with_capacity(usize::try_from(reserve).unwrap_or(payload.len()));

        let unpacked = match HuffmanTree::build(&header.frequencies) {
            Some(tree) => {
                let mut unpacker = BitUnpacker::new(&tree, header.symbol_total());
                unpacker.feed(payload, &mut bytes)?;
                unpacker.finish()
            }
            None => UnpackSummary {
                expected: 0,
                decoded: 0,
                trailing_bits: 0,
            },
        };

        let summary = DecodeSummary::new(&header, unpacked);
        check_complete(&summary, config)?;
        Ok(Decoded { bytes, summary })
    }

    /// Reads a container from `input` and writes the decoded bytes to `output`.
    pub fn decode_stream<R, W>(
        input: R,
        mut output: W,
        config: &CodecConfig,
    ) -> Result<DecodeSummary>
    where
        R: Read,
        W: Write,
    {
        config.validate()?;
        let mut input = input;
        let header = container::read_header(&mut input)?;

        let Some(tree) = HuffmanTree::build(&header.frequencies) else {
            let extra = io::copy(&mut input, &mut io::sink())?;
            if extra > 0 {
                return Err(HuffmanError::corrupt(
                    header.len,
                    HeaderFault::UnexpectedPayload(extra as usize),
                ));
            }
            output.flush()?;
            return Ok(DecodeSummary::new(
                &header,
                UnpackSummary {
                    expected: 0,
                    decoded: 0,
                    trailing_bits: 0,
                },
            ));
        };

        let mut unpacker = BitUnpacker::new(&tree, header.symbol_total());
        let mut chunk = vec![0u8; config.buffer_size];
        let mut decoded = Vec::with_capacity(config.buffer_size * 2);
        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            unpacker.feed(&chunk[..n], &mut decoded)?;
            output.write_all(&decoded)?;
            decoded.clear();
        }
        output.flush()?;

        let summary = DecodeSummary::new(&header, unpacker.finish());
        check_complete(&summary, config)?;
        Ok(summary)
    }

    pub fn decode_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<DecodeSummary> {
        config.validate()?;
        let reader = BufReader::with_capacity(config.buffer_size, File::open(input)?);
        let writer = BufWriter::with_capacity(config.buffer_size, File::create(output)?);
        let summary = Self::decode_stream(reader, writer, config)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            unique = summary.unique_symbols,
            decoded = summary.decoded_symbols,
            "decoded file"
        );
        Ok(summary)
    }
}

// A short payload keeps its partial output unless strict decoding is on.
fn check_complete(summary: &DecodeSummary, config: &CodecConfig) -> Result<()> {
    if summary.trailing_bits >= 8 {
        warn!(
            trailing_bits = summary.trailing_bits,
            "payload continues past the last symbol"
        );
    }
    if summary.is_complete() {
        return Ok(());
    }
    if config.strict {
        return Err(HuffmanError::CountMismatch {
            expected: summary.expected_symbols,
            decoded: summary.decoded_symbols,
        });
    }
    warn!(
        expected = summary.expected_symbols,
        decoded = summary.decoded_symbols,
        "payload ended before every symbol was decoded"
    );
    Ok(())
}
