//! Parallel encoder implementation using a producer-consumer pipeline.
//!
//! Architecture:
//! - Main thread: Read input, cut blocks, send jobs
//! - Worker pool: Serialize each block into its own bit buffer
//! - Main thread: Receive blocks in order, splice their bits onto the stream
//!
//! Blocks are not byte-aligned, so each worker's buffer is appended bit by
//! bit at the stream's current position. The output is byte-identical to
//! the single-threaded encoder.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter, Read, Write};

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};

use super::block::BlockEncoder;
use super::chunker::{BlockChunker, Chunk};
use crate::bits::BitWriter;
use crate::error::{Error, Result};
use crate::gzip::GzipTrailer;
use crate::{EncodeConfig, EncodeStats, Encoder};

/// A job for encoding a single block
struct EncodingJob {
    /// Sequence number for ordering output
    block_id: u64,
    chunk: Chunk,
}

/// Result of encoding a single block
struct EncodedBlock {
    /// Sequence number for ordering output
    block_id: u64,
    /// The block's bits, starting at bit 0
    bits: BitWriter,
}

/// Stream state owned by the main thread
struct StreamState<W: Write> {
    writer: W,
    bits: BitWriter,
    pending: BTreeMap<u64, EncodedBlock>,
    next_write_id: u64,
    stats: EncodeStats,
}

/// Parallel encoder implementation
pub struct ParallelEncoder {
    config: EncodeConfig,
}

impl ParallelEncoder {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    fn effective_threads(&self) -> usize {
        match self.config.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        }
    }
}

impl Encoder for ParallelEncoder {
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<EncodeStats> {
        let num_threads = self.effective_threads();

        // For single thread, delegate to single-threaded implementation for efficiency
        if num_threads == 1 {
            let mut single = super::single::SingleThreadedEncoder::new(self.config.clone());
            return single.encode(input, output);
        }

        self.config.validate()?;
        self.encode_parallel(input, output, num_threads)
    }
}

impl ParallelEncoder {
    fn encode_parallel<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        num_threads: usize,
    ) -> Result<EncodeStats> {
        // Channel capacity - enough to keep workers busy without excessive memory
        let channel_capacity = num_threads * 2;

        let (job_tx, job_rx): (Sender<EncodingJob>, Receiver<EncodingJob>) =
            bounded(channel_capacity);
        let (result_tx, result_rx): (Sender<Result<EncodedBlock>>, Receiver<Result<EncodedBlock>>) =
            bounded(channel_capacity);

        let block_encoder =
            BlockEncoder::new(self.config.length_strategy, self.config.cl_encoding)?;

        // Use crossbeam's scoped threads to avoid 'static lifetime requirements
        let result = crossbeam::scope(|scope| {
            for _ in 0..num_threads {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let block_encoder = block_encoder.clone();

                scope.spawn(move |_| {
                    worker_thread(job_rx, result_tx, block_encoder);
                });
            }

            // Drop our copies of the channels that workers use
            drop(job_rx);
            drop(result_tx);

            self.read_dispatch_and_write(input, output, job_tx, result_rx)
        });

        result.map_err(|_| Error::Internal("Thread panicked".to_string()))?
    }

    fn read_dispatch_and_write<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        job_tx: Sender<EncodingJob>,
        result_rx: Receiver<Result<EncodedBlock>>,
    ) -> Result<EncodeStats> {
        let reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut chunker = BlockChunker::new(reader, self.config.block_size)?;

        let mut state = StreamState {
            writer: BufWriter::with_capacity(self.config.buffer_size, output),
            bits: BitWriter::with_capacity(self.config.block_size + 1024),
            pending: BTreeMap::new(),
            next_write_id: 0,
            stats: EncodeStats::default(),
        };

        self.config.header.write_to(&mut state.bits);

        let mut next_block_id: u64 = 0;
        while let Some(chunk) = chunker.next_chunk()? {
            let mut job = EncodingJob { block_id: next_block_id, chunk };
            next_block_id += 1;

            // Send job, draining results while the queue is full to prevent deadlock
            loop {
                match job_tx.try_send(job) {
                    Ok(()) => break,
                    Err(TrySendError::Full(returned)) => {
                        job = returned;
                        let result = result_rx.recv().map_err(|_| {
                            Error::Internal("Result channel disconnected".to_string())
                        })?;
                        state.accept(result?)?;
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        return Err(Error::Internal("Workers disconnected".to_string()));
                    }
                }
            }
        }

        // Drop job_tx to signal workers we're done
        drop(job_tx);

        while state.next_write_id < next_block_id {
            let result = result_rx
                .recv()
                .map_err(|_| Error::Internal("Result channel disconnected".to_string()))?;
            state.accept(result?)?;
        }

        state.bits.align_to_byte();
        GzipTrailer::new(chunker.crc32(), chunker.bytes_read()).write_to(&mut state.bits);
        state.stats.output_bytes += state.bits.drain_to(&mut state.writer)? as u64;
        state.writer.flush()?;

        state.stats.input_bytes = chunker.bytes_read();
        state.stats.crc32 = chunker.crc32();
        Ok(state.stats)
    }
}

impl<W: Write> StreamState<W> {
    /// Buffer an out-of-order block, or splice it and any buffered successors
    fn accept(&mut self, block: EncodedBlock) -> Result<()> {
        self.pending.insert(block.block_id, block);

        while let Some(ready) = self.pending.remove(&self.next_write_id) {
            self.bits.append(&ready.bits);
            self.stats.output_bytes += self.bits.drain_to(&mut self.writer)? as u64;
            self.stats.blocks_written += 1;
            self.next_write_id += 1;
        }
        Ok(())
    }
}

/// Worker thread function: serializes blocks into private bit buffers
fn worker_thread(
    job_rx: Receiver<EncodingJob>,
    result_tx: Sender<Result<EncodedBlock>>,
    block_encoder: BlockEncoder,
) {
    while let Ok(job) = job_rx.recv() {
        let result = encode_block(&block_encoder, job);

        if result_tx.send(result).is_err() {
            // Main thread has stopped, exit
            break;
        }
    }
}

fn encode_block(block_encoder: &BlockEncoder, job: EncodingJob) -> Result<EncodedBlock> {
    let mut bits = BitWriter::with_capacity(job.chunk.data.len() + 1024);
    block_encoder.encode(&mut bits, &job.chunk.data, job.chunk.is_final)?;
    Ok(EncodedBlock { block_id: job.block_id, bits })
}
