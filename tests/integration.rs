//! End-to-end integration tests for dyngz.
//!
//! Every output is decoded by independent inflaters (flate2 and libdeflate).

use std::io::{Cursor, Read};
use std::process::Command;

use flate2::read::{DeflateDecoder, GzDecoder};

use dyngz::deflate::tokens::literals;
use dyngz::gzip::GzipHeader;
use dyngz::huffman::tables::{placeholder_distance_lengths, placeholder_literal_lengths};
use dyngz::{
    compress, verify_gzip, BitWriter, BlockSerializer, ClEncoding, CodeTable, EncodeConfig,
    Encoder, LengthStrategy, ParallelEncoder, SingleThreadedEncoder, Symbol,
};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate highly repetitive data
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    let pattern = b"AAAAAAAAAAAAAAAA";
    pattern.iter().cycle().take(size).copied().collect()
}

/// Generate text with a skewed byte distribution
fn generate_text_data(size: usize) -> Vec<u8> {
    let words: [&[u8]; 6] = [b"the ", b"quick ", b"brown ", b"fox ", b"jumps\n", b"over "];
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        data.extend_from_slice(words[(i * 7 + i / 3) % words.len()]);
        i += 1;
    }
    data.truncate(size);
    data
}

fn all_configs() -> Vec<EncodeConfig> {
    let mut configs = Vec::new();
    for length_strategy in [LengthStrategy::Placeholder, LengthStrategy::Adaptive] {
        for cl_encoding in [ClEncoding::Direct, ClEncoding::RunLength] {
            configs.push(EncodeConfig {
                block_size: 4096,
                length_strategy,
                cl_encoding,
                ..Default::default()
            });
        }
    }
    configs
}

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(data);
    let mut result = Vec::new();
    decoder.read_to_end(&mut result).unwrap();
    result
}

fn encode_single(data: &[u8], config: EncodeConfig) -> (Vec<u8>, dyngz::EncodeStats) {
    let mut output = Vec::new();
    let stats = SingleThreadedEncoder::new(config).encode(Cursor::new(data), &mut output).unwrap();
    (output, stats)
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_roundtrip_all_configurations() {
    let inputs = [
        generate_random_data(10_000, 42),
        generate_repetitive_data(10_000),
        generate_text_data(10_000),
        b"x".to_vec(),
    ];

    for config in all_configs() {
        for data in &inputs {
            let (output, stats) = encode_single(data, config.clone());
            assert_eq!(gunzip(&output), *data, "flate2 mismatch for {:?}", config);
            verify_gzip(&output, data).unwrap();
            assert_eq!(stats.input_bytes, data.len() as u64);
            assert_eq!(stats.output_bytes, output.len() as u64);
            assert_eq!(stats.crc32, crc32fast::hash(data));
        }
    }
}

#[test]
fn test_every_byte_value() {
    let data: Vec<u8> = (0..=255u8).cycle().take(256 * 4).collect();
    for config in all_configs() {
        let gz = compress(&data, config).unwrap();
        assert_eq!(gunzip(&gz), data);
    }
}

#[test]
fn test_large_data_many_blocks() {
    let data = generate_text_data(1_000_000);
    let config = EncodeConfig { block_size: 65_536, ..Default::default() };
    let (output, stats) = encode_single(&data, config);

    assert_eq!(stats.blocks_written, 16);
    assert_eq!(gunzip(&output), data);
}

#[test]
fn test_adaptive_compresses_skewed_input() {
    let data = generate_text_data(100_000);
    let placeholder = compress(&data, EncodeConfig::default()).unwrap();
    let adaptive = compress(
        &data,
        EncodeConfig { length_strategy: LengthStrategy::Adaptive, ..Default::default() },
    )
    .unwrap();

    // Placeholder codes spend at least 8 bits per byte
    assert!(placeholder.len() >= data.len());
    assert!(adaptive.len() < data.len() * 3 / 4);
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_empty_input() {
    for config in all_configs() {
        let (output, stats) = encode_single(&[], config);

        assert_eq!(stats.blocks_written, 1);
        assert_eq!(stats.input_bytes, 0);
        assert_eq!(stats.crc32, 0);
        // CRC-32 and ISIZE of nothing
        assert_eq!(&output[output.len() - 8..], &[0u8; 8]);
        assert!(gunzip(&output).is_empty());
        verify_gzip(&output, &[]).unwrap();
    }
}

#[test]
fn test_single_byte_input() {
    let (output, stats) = encode_single(b"Z", EncodeConfig::default());
    assert_eq!(stats.blocks_written, 1);
    assert_eq!(gunzip(&output), b"Z");
}

#[test]
fn test_data_at_block_boundary() {
    let block_size = 1000;
    for (len, blocks) in [(block_size - 1, 1), (block_size, 1), (block_size + 1, 2)] {
        let data = generate_random_data(len, 7);
        let config = EncodeConfig { block_size, ..Default::default() };
        let (output, stats) = encode_single(&data, config);

        assert_eq!(stats.blocks_written, blocks, "input of {} bytes", len);
        assert_eq!(gunzip(&output), data);
    }
}

#[test]
fn test_block_size_one() {
    let data = b"tiny blocks".to_vec();
    let config = EncodeConfig {
        block_size: 1,
        length_strategy: LengthStrategy::Adaptive,
        cl_encoding: ClEncoding::RunLength,
        ..Default::default()
    };
    let (output, stats) = encode_single(&data, config);

    assert_eq!(stats.blocks_written, data.len() as u64);
    assert_eq!(gunzip(&output), data);
}

#[test]
fn test_zero_block_size_rejected() {
    let config = EncodeConfig { block_size: 0, ..Default::default() };
    assert!(matches!(compress(b"abc", config), Err(dyngz::Error::InvalidBlockSize(0))));
}

// ============================================================================
// Container Framing
// ============================================================================

#[test]
fn test_header_bytes() {
    let gz = compress(b"abc", EncodeConfig::default()).unwrap();
    assert_eq!(&gz[..10], &[0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0x03]);
}

#[test]
fn test_header_with_filename() {
    let config = EncodeConfig {
        header: GzipHeader { filename: Some("reads.txt".to_string()), ..Default::default() },
        ..Default::default()
    };
    let gz = compress(b"named", config).unwrap();

    assert_eq!(gz[3], 0x08);
    assert_eq!(&gz[10..20], b"reads.txt\0");

    let mut decoder = GzDecoder::new(gz.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"named");
    assert_eq!(decoder.header().and_then(|h| h.filename()), Some(&b"reads.txt"[..]));
}

#[test]
fn test_trailer_fields() {
    let data = generate_random_data(5000, 3);
    let gz = compress(&data, EncodeConfig::default()).unwrap();
    let trailer = &gz[gz.len() - 8..];

    assert_eq!(u32::from_le_bytes(trailer[..4].try_into().unwrap()), crc32fast::hash(&data));
    assert_eq!(u32::from_le_bytes(trailer[4..].try_into().unwrap()), 5000);
}

#[test]
fn test_first_block_header_bits() {
    let gz = compress(b"hi", EncodeConfig::default()).unwrap();
    // BFINAL=1, BTYPE=2, then HLIT=29 in the top three bits of the byte
    assert_eq!(gz[10] & 0x07, 0x05);
    assert_eq!(gz[10] >> 3, 29);
}

// ============================================================================
// Parallel Encoding
// ============================================================================

#[test]
fn test_parallel_matches_single_threaded() {
    let data = generate_text_data(300_000);

    for config in all_configs() {
        let (single_out, single_stats) = encode_single(&data, config.clone());

        for threads in [2, 4, 8] {
            let mut parallel_out = Vec::new();
            let parallel_config = EncodeConfig { num_threads: threads, ..config.clone() };
            let parallel_stats = ParallelEncoder::new(parallel_config)
                .encode(Cursor::new(&data), &mut parallel_out)
                .unwrap();

            assert_eq!(parallel_out, single_out, "{} threads, {:?}", threads, config);
            assert_eq!(parallel_stats, single_stats);
        }
    }
}

#[test]
fn test_parallel_auto_threads() {
    let data = generate_random_data(200_000, 11);
    let config = EncodeConfig { num_threads: 0, block_size: 10_000, ..Default::default() };
    let gz = compress(&data, config).unwrap();
    assert_eq!(gunzip(&gz), data);
}

// ============================================================================
// Block Serializer
// ============================================================================

#[test]
fn test_serializer_with_back_references() {
    let literal = CodeTable::from_lengths(&placeholder_literal_lengths()).unwrap();
    let distance = CodeTable::from_lengths(&placeholder_distance_lengths()).unwrap();

    let symbols = vec![
        Symbol::Literal(b'a'),
        Symbol::Literal(b'b'),
        Symbol::Literal(b'c'),
        Symbol::Copy { length: 9, distance: 3 },
        Symbol::Literal(b'!'),
        Symbol::Copy { length: 258, distance: 1 },
    ];

    for cl_encoding in [ClEncoding::Direct, ClEncoding::RunLength] {
        let mut writer = BitWriter::new();
        BlockSerializer::new(cl_encoding)
            .emit_block(&mut writer, &literal, &distance, &symbols, true)
            .unwrap();

        let mut out = Vec::new();
        DeflateDecoder::new(writer.finish().as_slice()).read_to_end(&mut out).unwrap();

        let mut expected = b"abcabcabcabc!".to_vec();
        expected.extend(std::iter::repeat(b'!').take(258));
        assert_eq!(out, expected);
    }
}

#[test]
fn test_serializer_multiple_blocks_unaligned() {
    let literal = CodeTable::from_lengths(&placeholder_literal_lengths()).unwrap();
    let distance = CodeTable::from_lengths(&placeholder_distance_lengths()).unwrap();
    let serializer = BlockSerializer::new(ClEncoding::Direct);

    let mut writer = BitWriter::new();
    serializer.emit_block(&mut writer, &literal, &distance, &literals(b"one "), false).unwrap();
    // The second block starts mid-byte
    assert_ne!(writer.bit_len() % 8, 0);
    serializer.emit_block(&mut writer, &literal, &distance, &literals(b"two"), true).unwrap();

    let mut out = Vec::new();
    DeflateDecoder::new(writer.finish().as_slice()).read_to_end(&mut out).unwrap();
    assert_eq!(out, b"one two");
}

// ============================================================================
// Verification
// ============================================================================

#[test]
fn test_verify_rejects_truncated_stream() {
    let data = generate_text_data(10_000);
    let gz = compress(&data, EncodeConfig::default()).unwrap();
    verify_gzip(&gz, &data).unwrap();
    assert!(verify_gzip(&gz[..gz.len() / 2], &data).is_err());
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
#[ignore] // Run with --ignored flag when binary is available
fn test_cli_encode_file() {
    let data = generate_text_data(50_000);

    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    let output_path = dir.path().join("input.txt.gz");
    std::fs::write(&input_path, &data).unwrap();

    let output = Command::new("cargo")
        .args(["run", "--bin", "dyngz", "--"])
        .args(["--adaptive", "--rle", "--name", "--verify", "-t", "2", "-i"])
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .output()
        .expect("Failed to run CLI");

    assert!(output.status.success(), "CLI failed: {}", String::from_utf8_lossy(&output.stderr));

    let gz = std::fs::read(&output_path).unwrap();
    assert_eq!(&gz[10..20], b"input.txt\0");
    assert_eq!(gunzip(&gz), data);
}

#[test]
#[ignore] // Run with --ignored flag when binary is available
fn test_cli_rejects_zero_block_size() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    std::fs::write(&input_path, b"data").unwrap();

    let output = Command::new("cargo")
        .args(["run", "--bin", "dyngz", "--", "--block-size", "0", "-i"])
        .arg(&input_path)
        .arg("-o")
        .arg(dir.path().join("out.gz"))
        .output()
        .expect("Failed to run CLI");

    assert_eq!(output.status.code(), Some(2));
}
