//! Container header codec.
//!
//! ```text
//! [u32 symbol_count]
//! symbol_count x ([u8 symbol] [u32 frequency])
//! [packed payload: remaining bytes]
//! ```
//!
//! Integers are little-endian. Entries are written in ascending symbol
//! order; the number of symbols to decode is the sum of the frequencies.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{HeaderFault, HuffmanError, Result};
use crate::frequency::FrequencyTable;

const COUNT_LEN: usize = 4;
const ENTRY_LEN: usize = 5;

/// A decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub frequencies: FrequencyTable,
    /// Bytes the header occupied, i.e. where the payload starts.
    pub len: usize,
}

impl Header {
    pub fn encoded_len(symbol_count: usize) -> usize {
        COUNT_LEN + symbol_count * ENTRY_LEN
    }

    /// Number of symbols the payload must decode to.
    pub fn symbol_total(&self) -> u64 {
        self.frequencies.total()
    }
}

/// Writes the header for `frequencies`, returning the bytes written.
pub fn write_header<W: Write>(writer: &mut W, frequencies: &FrequencyTable) -> Result<usize> {
    let symbol_count = frequencies.unique_symbols();
    for (symbol, count) in frequencies.iter() {
        if count > u32::MAX as u64 {
            return Err(HuffmanError::FrequencyOverflow { symbol, count });
        }
    }

    writer.write_u32::<LittleEndian>(symbol_count as u32)?;
    for (symbol, count) in frequencies.iter() {
        writer.write_u8(symbol)?;
        writer.write_u32::<LittleEndian>(count as u32)?;
    }

    let len = Header::encoded_len(symbol_count);
    debug!(symbols = symbol_count, bytes = len, "wrote container header");
    Ok(len)
}

/// Reads and validates a header, leaving `reader` at the first payload byte.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let mut offset = 0;

    let symbol_count = read_field(reader, offset, COUNT_LEN, |r| r.read_u32::<LittleEndian>())?;
    if symbol_count > 256 {
        return Err(HuffmanError::corrupt(offset, HeaderFault::TooManySymbols(symbol_count)));
    }
    offset += COUNT_LEN;

    let mut frequencies = FrequencyTable::new();
    for _ in 0..symbol_count {
        let symbol = read_field(reader, offset, 1, |r| r.read_u8())?;
        let count = read_field(reader, offset + 1, COUNT_LEN, |r| r.read_u32::<LittleEndian>())?;
        if frequencies.get(symbol) > 0 {
            return Err(HuffmanError::corrupt(offset, HeaderFault::DuplicateSymbol(symbol)));
        }
        if count == 0 {
            return Err(HuffmanError::corrupt(offset, HeaderFault::ZeroFrequency(symbol)));
        }
        frequencies.set(symbol, count as u64);
        offset += ENTRY_LEN;
    }

    debug!(symbols = symbol_count, total = frequencies.total(), "read container header");
    Ok(Header { frequencies, len: offset })
}

/// Splits an in-memory container into its header and payload.
pub fn split(container: &[u8]) -> Result<(Header, &[u8])> {
    let mut cursor = container;
    let header = read_header(&mut cursor)?;
    let payload = &container[header.len..];
    if header.frequencies.is_empty() && !payload.is_empty() {
        return Err(HuffmanError::corrupt(
            header.len,
            HeaderFault::UnexpectedPayload(payload.len()),
        ));
    }
    Ok((header, payload))
}

// Short reads become a truncated-header fault at the field's offset.
fn read_field<R, T, F>(reader: &mut R, offset: usize, width: usize, read: F) -> Result<T>
where
    R: Read,
    F: FnOnce(&mut R) -> io::Result<T>,
{
    read(reader).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            HuffmanError::corrupt(offset, HeaderFault::Truncated { needed: width })
        } else {
            HuffmanError::Io(e)
        }
    })
}
