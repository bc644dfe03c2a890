//! Command-line arguments and output file naming for `huff`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use huffpack::config::DEFAULT_BUFFER_SIZE;
use huffpack::CodecConfig;

pub const ENCODED_SUFFIX: &str = ".huff";
pub const DECODED_SUFFIX: &str = "_decoded.bin";

/// Static Huffman file compressor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Read and write buffer size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Fail when a payload decodes to fewer symbols than its header promises
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file (default output: <input>.huff)
    Encode {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a .huff file (default output: <stem>_decoded.bin)
    Decode {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode, decode and compare a file, then remove the temporaries
    Test {
        input: PathBuf,
        /// Keep the .huff and decoded files
        #[arg(long)]
        keep: bool,
    },
    /// Print the code assigned to every byte of a file
    Dictionary { input: PathBuf },
    /// Check two files for byte equality
    Compare { first: PathBuf, second: PathBuf },
}

impl CliArgs {
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig::default()
            .buffer_size(self.buffer_size)
            .strict(self.strict)
    }
}

/// `<input>.huff`
pub fn encoded_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(ENCODED_SUFFIX);
    PathBuf::from(name)
}

/// Input with its first `.huff` cut off, plus `_decoded.bin`.
pub fn decoded_path(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    let stem = match name.find(ENCODED_SUFFIX) {
        Some(at) => &name[..at],
        None => &name[..],
    };
    PathBuf::from(format!("{stem}{DECODED_SUFFIX}"))
}

pub fn has_encoded_suffix(input: &Path) -> bool {
    input.to_string_lossy().contains(ENCODED_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(encoded_path(Path::new("notes.txt")), PathBuf::from("notes.txt.huff"));
        assert_eq!(
            decoded_path(Path::new("notes.txt.huff")),
            PathBuf::from("notes.txt_decoded.bin")
        );
        assert_eq!(decoded_path(Path::new("blob")), PathBuf::from("blob_decoded.bin"));
        assert!(has_encoded_suffix(Path::new("a.huff")));
        assert!(!has_encoded_suffix(Path::new("a.bin")));
    }

    #[test]
    fn test_parse_global_flags() {
        let args = CliArgs::parse_from([
            "huff",
            "decode",
            "x.huff",
            "--strict",
            "--buffer-size",
            "4096",
        ]);
        assert!(args.strict);
        assert_eq!(args.codec_config().buffer_size, 4096);
        match args.command {
            Command::Decode { input, output } => {
                assert_eq!(input, PathBuf::from("x.huff"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
