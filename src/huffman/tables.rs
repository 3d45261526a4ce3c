use crate::deflate::tables::{MAX_DISTANCE_CODES, MAX_LITERAL_CODES, NUM_CL_SYMBOLS};

/// Placeholder literal/length code lengths
///
/// Symbols 0-225 get 8 bits and 226-285 get 9 bits. The table is
/// Kraft-complete (226/256 + 60/512 = 1), so strict decoders accept it.
pub fn placeholder_literal_lengths() -> [u8; MAX_LITERAL_CODES] {
    let mut lengths = [0u8; MAX_LITERAL_CODES];
    lengths[0..=225].fill(8);
    lengths[226..=285].fill(9);
    lengths
}

/// Placeholder distance code lengths: 0-1 get 4 bits, 2-29 get 5 bits
pub fn placeholder_distance_lengths() -> [u8; MAX_DISTANCE_CODES] {
    let mut lengths = [0u8; MAX_DISTANCE_CODES];
    lengths[0..=1].fill(4);
    lengths[2..=29].fill(5);
    lengths
}

/// Flat code-length alphabet code: 4 bits for 0-12, 5 bits for 13-18
pub const FLAT_CL_LENGTHS: [u8; NUM_CL_SYMBOLS] =
    [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5];
