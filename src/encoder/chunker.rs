use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

/// One block's worth of input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub data: Vec<u8>,
    /// No further blocks follow
    pub is_final: bool,
}

/// Splits input into blocks of at most `block_size` bytes.
///
/// One byte of look-ahead tells whether a full block is the last one, so a
/// trailing empty block is never produced. The only empty chunk is the single
/// final chunk of an empty input. The running CRC-32 and byte count cover
/// every byte handed out so far.
pub struct BlockChunker<R: Read> {
    reader: R,
    block_size: usize,
    lookahead: Option<u8>,
    hasher: crc32fast::Hasher,
    bytes_read: u64,
    finished: bool,
}

impl<R: Read> BlockChunker<R> {
    pub fn new(reader: R, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        Ok(Self {
            reader,
            block_size,
            lookahead: None,
            hasher: crc32fast::Hasher::new(),
            bytes_read: 0,
            finished: false,
        })
    }

    /// Next chunk, or `None` once the final chunk has been returned
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.finished {
            return Ok(None);
        }

        let mut data = Vec::with_capacity(self.block_size);
        data.extend(self.lookahead.take());

        let wanted = (self.block_size - data.len()) as u64;
        self.reader.by_ref().take(wanted).read_to_end(&mut data)?;

        let is_final = if data.len() < self.block_size {
            true
        } else {
            self.lookahead = self.read_byte()?;
            self.lookahead.is_none()
        };

        self.hasher.update(&data);
        self.bytes_read += data.len() as u64;
        self.finished = is_final;

        Ok(Some(Chunk { data, is_final }))
    }

    /// CRC-32 of all bytes returned in chunks so far
    pub fn crc32(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Number of bytes returned in chunks so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}
