use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use huffpack::code_table::code_string;
use huffpack::{CodecConfig, FrequencyTable, HeaderFault, HuffmanCodec, HuffmanError};

#[test]
fn test_empty_input() {
    let container = huffpack::encode(&[]).unwrap();
    assert_eq!(container, vec![0, 0, 0, 0]);
    assert!(huffpack::decode(&container).unwrap().is_empty());
}

#[test]
fn test_single_symbol_any_length() {
    for n in [1usize, 2, 7, 8, 9, 1000, 100_003] {
        let input = vec![0xa5u8; n];
        let container = huffpack::encode(&input).unwrap();
        assert_eq!(&container[..5], &[1, 0, 0, 0, 0xa5]);
        assert_eq!(&container[5..9], &(n as u32).to_le_bytes());
        assert_eq!(container.len(), 9 + (n + 7) / 8);
        assert_eq!(huffpack::decode(&container).unwrap(), input);
    }
}

#[test]
fn test_small_example() {
    let container = huffpack::encode(b"aaaabbc").unwrap();
    assert_eq!(&container[..4], &3u32.to_le_bytes());
    let total: u32 = (0..3)
        .map(|i| {
            let at = 4 + i * 5 + 1;
            u32::from_le_bytes(container[at..at + 4].try_into().unwrap())
        })
        .sum();
    assert_eq!(total, 7);
    assert_eq!(huffpack::decode(&container).unwrap(), b"aaaabbc");

    let table = huffpack::dictionary(&FrequencyTable::from_bytes(b"aaaabbc"));
    assert!(table.get(b'a').unwrap().len() < table.get(b'c').unwrap().len());
    assert_eq!(code_string(table.get(b'a').unwrap()), "1");
}

#[test]
fn test_random_inputs_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let len = rng.gen_range(0..2048);
        let alphabet = rng.gen_range(1..=256u32);
        let input: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect();

        let container = huffpack::encode(&input).unwrap();
        assert_eq!(huffpack::decode(&container).unwrap(), input);
        assert_eq!(huffpack::encode(&input).unwrap(), container);

        let table = huffpack::dictionary(&FrequencyTable::from_bytes(&input));
        assert!(table.is_prefix_free());
    }
}

#[test]
fn test_skewed_input_roundtrip() {
    let mut input = Vec::new();
    for symbol in 0..30u8 {
        input.extend(std::iter::repeat(symbol).take(1 << (symbol / 2)));
    }
    let container = huffpack::encode(&input).unwrap();
    assert!(container.len() < input.len());
    assert_eq!(huffpack::decode(&container).unwrap(), input);
}

#[test]
fn test_header_sum_exceeding_payload_is_detected() {
    let mut container = huffpack::encode(b"hello huffman").unwrap();
    // the first entry now claims far more symbols than the payload holds
    container[5..9].copy_from_slice(&1000u32.to_le_bytes());
    let strict = CodecConfig::default().strict(true);
    let err = HuffmanCodec::decode_bytes(&container, &strict).unwrap_err();
    assert!(err.is_count_mismatch());

    let lenient = HuffmanCodec::decode_bytes(&container, &CodecConfig::default()).unwrap();
    assert!(!lenient.summary.is_complete());
}

#[test]
fn test_truncated_header_is_corrupt() {
    let container = huffpack::encode(b"hello huffman").unwrap();
    let err = huffpack::decode(&container[..12]).unwrap_err();
    assert!(matches!(
        err,
        HuffmanError::CorruptHeader { fault: HeaderFault::Truncated { .. }, .. }
    ));
}

#[test]
fn test_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.txt");
    let encoded = dir.path().join("source.txt.huff");
    let decoded = dir.path().join("source_decoded.bin");

    let text = "The quick brown fox jumps over the lazy dog. ".repeat(500);
    fs::write(&source, &text).unwrap();

    let config = CodecConfig::default().buffer_size(333);
    let summary = HuffmanCodec::encode_file(&source, &encoded, &config).unwrap();
    assert_eq!(summary.input_bytes, text.len() as u64);
    assert_eq!(fs::metadata(&encoded).unwrap().len(), summary.output_bytes());
    assert!(summary.compression_ratio().unwrap() < 1.0);

    let summary = HuffmanCodec::decode_file(&encoded, &decoded, &config).unwrap();
    assert!(summary.is_complete());
    assert_eq!(fs::read(&decoded).unwrap(), text.as_bytes());

    assert_eq!(fs::read(&encoded).unwrap(), huffpack::encode(text.as_bytes()).unwrap());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = HuffmanCodec::encode_file(
        &dir.path().join("does-not-exist"),
        &dir.path().join("out.huff"),
        &CodecConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HuffmanError::Io(_)));
}
