use super::BitSink;
use std::io::{self, Write};

/// Bit-level writer for DEFLATE output
///
/// Writes bits LSB-first to match DEFLATE format. Completed bytes accumulate
/// in memory until drained; the partial byte stays behind so blocks can be
/// packed back to back without byte alignment.
#[derive(Clone, Debug)]
pub struct BitWriter {
    /// Completed output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { output: Vec::with_capacity(65536), current_byte: 0, bits_in_byte: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0 }
    }

    /// Write `n` bits (0-32) from value in LSB-first order
    pub fn write_bits(&mut self, value: u32, n: u8) {
        debug_assert!(n <= 32);

        if n == 0 {
            return;
        }

        let mut val = value;
        let mut remaining = n;

        while remaining > 0 {
            let space = 8 - self.bits_in_byte;
            let to_write = remaining.min(space);

            let mask = (1u32 << to_write) - 1;
            self.current_byte |= ((val & mask) as u8) << self.bits_in_byte;

            val >>= to_write;
            self.bits_in_byte += to_write;
            remaining -= to_write;

            if self.bits_in_byte == 8 {
                self.output.push(self.current_byte);
                self.current_byte = 0;
                self.bits_in_byte = 0;
            }
        }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    /// Write a Huffman code of `length` bits, MSB first
    pub fn write_bits_reversed(&mut self, code: u32, length: u8) {
        let reversed = reverse_bits(code, length);
        self.write_bits(reversed, length);
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bits_in_byte == 0 {
            self.output.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(b as u32, 8);
            }
        }
    }

    /// Append every bit written to `other`, continuing at this writer's bit position
    pub fn append(&mut self, other: &BitWriter) {
        self.write_bytes(&other.output);
        self.write_bits(other.current_byte as u32, other.bits_in_byte);
    }

    /// Move completed bytes to `sink`, keeping any partial byte buffered
    ///
    /// Returns the number of bytes written.
    pub fn drain_to<W: Write>(&mut self, sink: &mut W) -> io::Result<usize> {
        let n = self.output.len();
        sink.write_all(&self.output)?;
        self.output.clear();
        Ok(n)
    }

    /// Finish and return the output bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Total number of bits written and not yet drained
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.bits_in_byte as usize
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.bits_in_byte == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSink for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        BitWriter::write_bit(self, bit);
    }

    fn write_bits(&mut self, value: u32, n: u8) {
        BitWriter::write_bits(self, value, n);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        BitWriter::write_bytes(self, bytes);
    }

    fn align_to_byte(&mut self) {
        BitWriter::align_to_byte(self);
    }

    fn write_code(&mut self, code: u32, length: u8) {
        self.write_bits_reversed(code, length);
    }
}

/// Reverse the bottom `n` bits of `value`
fn reverse_bits(value: u32, n: u8) -> u32 {
    let mut result = 0u32;
    let mut v = value;
    for _ in 0..n {
        result = (result << 1) | (v & 1);
        v >>= 1;
    }
    result
}
