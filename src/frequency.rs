use std::io::{self, Read};
use std::ops::Index;

/// Occurrence count for every byte value.
///
/// All 256 slots always exist; a zero count means the symbol is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: [0; 256] }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.record(bytes);
        table
    }

    /// Reads `reader` to the end, counting every byte.
    pub fn from_reader<R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Self> {
        let mut table = Self::new();
        let mut chunk = vec![0u8; chunk_size.max(1)];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.record(&chunk[..n]);
        }
        Ok(table)
    }

    pub fn record(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn set(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = count;
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, i.e. the number of symbols a payload carries.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn unique_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present symbols in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for FrequencyTable {
    type Output = u64;

    fn index(&self, symbol: u8) -> &u64 {
        &self.counts[symbol as usize]
    }
}

impl From<&[u8]> for FrequencyTable {
    fn from(bytes: &[u8]) -> Self {
        FrequencyTable::from_bytes(bytes)
    }
}
