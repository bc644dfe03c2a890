//! Error types for encoding and decoding containers.

use std::io;

use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

/// Errors that can occur while building, writing or reading a container.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// The source or destination could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The container header cannot describe a valid frequency table.
    #[error("corrupt header at byte {offset}: {fault}")]
    CorruptHeader { offset: usize, fault: HeaderFault },

    /// An input byte has no code in the table used to pack it.
    #[error("byte 0x{symbol:02x} at offset {offset} has no code")]
    MissingCode { symbol: u8, offset: u64 },

    /// A symbol occurs more often than the uint32 header field can record.
    #[error("symbol 0x{symbol:02x} occurs {count} times, more than a header can store")]
    FrequencyOverflow { symbol: u8, count: u64 },

    /// The packed symbols disagree with the frequency table written in the header.
    #[error("header promises {expected} symbols but {actual} were packed")]
    SymbolCountMismatch { expected: u64, actual: u64 },

    /// A payload bit walks off the tree.
    #[error("payload bit {bit_offset} does not follow any tree branch")]
    InvalidCode { bit_offset: u64 },

    /// The payload ran out before every promised symbol was decoded.
    ///
    /// Only returned when strict decoding is requested; otherwise the
    /// partial output is kept and the shortfall is reported as a warning.
    #[error("expected {expected} symbols, decoded {decoded}")]
    CountMismatch { expected: u64, decoded: u64 },

    /// The configuration cannot be used.
    #[error("invalid configuration: {0}")]
    Config(&'static str),
}

/// Reasons a header is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderFault {
    #[error("truncated, need {needed} more bytes")]
    Truncated { needed: usize },

    #[error("symbol count {0} exceeds 256")]
    TooManySymbols(u32),

    #[error("symbol 0x{0:02x} listed twice")]
    DuplicateSymbol(u8),

    #[error("symbol 0x{0:02x} listed with zero frequency")]
    ZeroFrequency(u8),

    #[error("no symbols declared but {0} payload bytes follow")]
    UnexpectedPayload(usize),
}

impl HuffmanError {
    pub(crate) fn corrupt(offset: usize, fault: HeaderFault) -> Self {
        HuffmanError::CorruptHeader { offset, fault }
    }

    /// Returns true for the recoverable short-payload condition.
    pub fn is_count_mismatch(&self) -> bool {
        matches!(self, HuffmanError::CountMismatch { .. })
    }
}
