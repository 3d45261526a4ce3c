use super::block::BlockEncoder;
use super::chunker::BlockChunker;
use crate::bits::BitWriter;
use crate::error::Result;
use crate::gzip::GzipTrailer;
use crate::{EncodeConfig, EncodeStats, Encoder};
use std::io::{BufReader, BufWriter, Read, Write};

/// Single-threaded encoder implementation
pub struct SingleThreadedEncoder {
    config: EncodeConfig,
}

impl SingleThreadedEncoder {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }
}

impl Encoder for SingleThreadedEncoder {
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<EncodeStats> {
        self.config.validate()?;

        let reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);

        let mut chunker = BlockChunker::new(reader, self.config.block_size)?;
        let block_encoder =
            BlockEncoder::new(self.config.length_strategy, self.config.cl_encoding)?;

        // Blocks are packed back to back; only whole bytes leave the bit writer
        let mut bits = BitWriter::with_capacity(self.config.block_size + 1024);
        let mut stats = EncodeStats::default();

        self.config.header.write_to(&mut bits);

        while let Some(chunk) = chunker.next_chunk()? {
            block_encoder.encode(&mut bits, &chunk.data, chunk.is_final)?;
            stats.blocks_written += 1;
            stats.output_bytes += bits.drain_to(&mut writer)? as u64;
        }

        bits.align_to_byte();
        GzipTrailer::new(chunker.crc32(), chunker.bytes_read()).write_to(&mut bits);
        stats.output_bytes += bits.drain_to(&mut writer)? as u64;
        writer.flush()?;

        stats.input_bytes = chunker.bytes_read();
        stats.crc32 = chunker.crc32();

        Ok(stats)
    }
}
