pub mod writer;

pub use writer::BitWriter;

/// Destination for a DEFLATE bitstream.
///
/// Numeric fields go out LSB-first (`write_bits`); Huffman codes go out
/// MSB-first (`write_code`). Both conventions share one bit order within bytes:
/// the first bit written lands in bit 0 of the current byte.
pub trait BitSink {
    /// Write a single bit
    fn write_bit(&mut self, bit: bool);

    /// Write the low `n` bits (0-32) of `value`, bit 0 first
    fn write_bits(&mut self, value: u32, n: u8);

    /// Write raw bytes, passing through the bit accumulator if unaligned
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Pad with zero bits to the next byte boundary
    fn align_to_byte(&mut self);

    /// Write the low `length` bits of a Huffman code, most significant bit first
    fn write_code(&mut self, code: u32, length: u8) {
        for i in (0..length).rev() {
            self.write_bit((code >> i) & 1 == 1);
        }
    }
}
