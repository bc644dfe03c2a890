use crate::error::{HuffmanError, Result};

/// Default size of I/O buffers and of the packer's pending bit buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Knobs for the stream and file paths of [`HuffmanCodec`](crate::HuffmanCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Bytes per read chunk and per buffered writer.
    pub buffer_size: usize,
    /// Fail with `CountMismatch` instead of keeping partial output.
    pub strict: bool,
}

impl CodecConfig {
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(HuffmanError::Config("buffer size must be at least one byte"));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_setters() {
        let config = CodecConfig::default();
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!(!config.strict);

        let config = config.buffer_size(512).strict(true);
        assert_eq!(config, CodecConfig { buffer_size: 512, strict: true });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = CodecConfig::default().buffer_size(0).validate().unwrap_err();
        assert!(matches!(err, HuffmanError::Config(_)));
    }
}
