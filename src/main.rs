mod cli;

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use huffpack::{CodecConfig, DecodeSummary, EncodeSummary, HuffmanCodec};

use cli::{CliArgs, Command};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log level")?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;
    Ok(())
}

/// Returns `Ok(false)` when a comparison finds a difference.
fn run(args: &CliArgs) -> Result<bool> {
    let config = args.codec_config();
    config.validate()?;

    match &args.command {
        Command::Encode { input, output } => {
            let output = output.clone().unwrap_or_else(|| cli::encoded_path(input));
            encode(input, &output, &config)?;
            Ok(true)
        }
        Command::Decode { input, output } => {
            if !cli::has_encoded_suffix(input) {
                warn!(input = %input.display(), "file doesn't have .huff extension");
            }
            let output = output.clone().unwrap_or_else(|| cli::decoded_path(input));
            decode(input, &output, &config)?;
            Ok(true)
        }
        Command::Test { input, keep } => self_test(input, *keep, &config),
        Command::Dictionary { input } => {
            let codec = HuffmanCodec::from_file(input, &config)
                .with_context(|| format!("cannot read {}", input.display()))?;
            print!("{}", codec.code_table().dictionary(codec.frequencies()));
            Ok(true)
        }
        Command::Compare { first, second } => {
            let same = files_equal(first, second)?;
            println!("{}", if same { "Files are identical" } else { "Files are different" });
            Ok(same)
        }
    }
}

fn encode(input: &Path, output: &Path, config: &CodecConfig) -> Result<EncodeSummary> {
    let summary = HuffmanCodec::encode_file(input, output, config)
        .with_context(|| format!("failed to encode {}", input.display()))?;
    print_encode_summary(input, output, &summary);
    Ok(summary)
}

fn decode(input: &Path, output: &Path, config: &CodecConfig) -> Result<DecodeSummary> {
    let summary = HuffmanCodec::decode_file(input, output, config)
        .with_context(|| format!("failed to decode {}", input.display()))?;
    print_decode_summary(&summary);
    Ok(summary)
}

fn print_encode_summary(input: &Path, output: &Path, summary: &EncodeSummary) {
    println!("=== Encoding Results ===");
    println!("Input file:  {} ({} bytes)", input.display(), summary.input_bytes);
    println!("Output file: {} ({} bytes)", output.display(), summary.output_bytes());
    println!("Total bits:  {}", summary.payload_bits);
    if let Some(saving) = summary.space_saving() {
        println!("Compression: {saving:.2}%");
    }
}

fn print_decode_summary(summary: &DecodeSummary) {
    println!("=== Decoding Information ===");
    println!("Unique symbols: {}", summary.unique_symbols);
    println!("Total symbols to decode: {}", summary.expected_symbols);
    println!("Decoded symbols: {}", summary.decoded_symbols);
    if !summary.is_complete() {
        println!(
            "Warning: expected {} symbols, decoded {}",
            summary.expected_symbols, summary.decoded_symbols
        );
    }
}

fn self_test(input: &Path, keep: bool, config: &CodecConfig) -> Result<bool> {
    let encoded = cli::encoded_path(input);
    let decoded = cli::decoded_path(&encoded);

    let outcome = encode(input, &encoded, config)
        .and_then(|_| decode(&encoded, &decoded, config))
        .and_then(|_| files_equal(input, &decoded));

    if !keep {
        for path in [&encoded, &decoded] {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "could not remove temporary file");
            }
        }
        info!("temporary files removed");
    }

    let same = outcome?;
    if same {
        println!("SUCCESS: Original and decoded files are identical!");
    } else {
        println!("FAILURE: Files are different!");
    }
    Ok(same)
}

fn files_equal(first: &Path, second: &Path) -> Result<bool> {
    let open = |path: &Path| {
        File::open(path)
            .map(BufReader::new)
            .with_context(|| format!("cannot open {}", path.display()))
    };
    let (a, b) = (open(first)?, open(second)?);

    let mut a = a.bytes();
    let mut b = b.bytes();
    loop {
        match (a.next().transpose()?, b.next().transpose()?) {
            (None, None) => return Ok(true),
            (Some(x), Some(y)) if x == y => continue,
            _ => return Ok(false),
        }
    }
}
