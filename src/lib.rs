pub mod bits;
pub mod deflate;
pub mod encoder;
pub mod error;
pub mod gzip;
pub mod huffman;
pub mod verify;

pub use bits::{BitSink, BitWriter};
pub use deflate::{BlockSerializer, ClEncoding, Symbol};
pub use encoder::{parallel::ParallelEncoder, single::SingleThreadedEncoder};
pub use error::{Error, Result};
pub use huffman::{build_codes, CodeTable};
pub use verify::verify_gzip;

use std::io::{Read, Write};

/// Default maximum number of input bytes per DEFLATE block
pub const DEFAULT_BLOCK_SIZE: usize = 100_000;

/// How code lengths are chosen for each block
///
/// - `Placeholder`: fixed 8/9-bit literal and 4/5-bit distance tables, the
///   same for every block (no compression, but always valid)
/// - `Adaptive`: Huffman lengths fitted to each block's byte frequencies,
///   limited to 15 bits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LengthStrategy {
    #[default]
    Placeholder,
    Adaptive,
}

/// Configuration for encoding
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Maximum uncompressed bytes per block (default: 100000)
    pub block_size: usize,
    /// Code-length selection per block
    pub length_strategy: LengthStrategy,
    /// Code-length table encoding in block headers
    pub cl_encoding: ClEncoding,
    /// Number of threads for parallel encoding (0 = auto, 1 = single-threaded)
    pub num_threads: usize,
    /// Buffer size for I/O operations
    pub buffer_size: usize,
    /// Gzip header fields
    pub header: gzip::GzipHeader,
}

impl EncodeConfig {
    /// Reject settings no encoder can honor
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            length_strategy: LengthStrategy::Placeholder,
            cl_encoding: ClEncoding::Direct,
            num_threads: 1,
            buffer_size: 128 * 1024,
            header: gzip::GzipHeader::default(),
        }
    }
}

/// Statistics from an encoding operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub blocks_written: u64,
    /// CRC-32 of the input, as written in the trailer
    pub crc32: u32,
}

/// Trait for the complete encoding operation
pub trait Encoder {
    /// Encode raw input into a single gzip member
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<EncodeStats>;
}

/// Encode a byte slice into a gzip member in memory
pub fn compress(data: &[u8], config: EncodeConfig) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    if config.num_threads == 1 {
        SingleThreadedEncoder::new(config).encode(data, &mut output)?;
    } else {
        ParallelEncoder::new(config).encode(data, &mut output)?;
    }
    Ok(output)
}
