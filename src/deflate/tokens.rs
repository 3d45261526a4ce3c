use super::tables::{encode_distance, encode_length};
use crate::error::{Error, Result};

/// One entry of a block's symbol stream
///
/// End-of-block is not part of the stream: the serializer always appends it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `distance` bytes back
    Copy { length: u16, distance: u16 },
}

/// A back-reference resolved to its alphabet symbols and extra bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyCodes {
    pub length_symbol: u16,
    pub length_extra: u16,
    pub length_extra_bits: u8,
    pub distance_symbol: u16,
    pub distance_extra: u16,
    pub distance_extra_bits: u8,
}

impl Symbol {
    /// Resolve a `Copy` into length/distance symbols, or `None` for a literal
    pub fn copy_codes(&self) -> Result<Option<CopyCodes>> {
        let Symbol::Copy { length, distance } = *self else {
            return Ok(None);
        };

        let invalid = || Error::InvalidCopy { length, distance };
        let (length_symbol, length_extra, length_extra_bits) =
            encode_length(length).ok_or_else(invalid)?;
        let (distance_symbol, distance_extra, distance_extra_bits) =
            encode_distance(distance).ok_or_else(invalid)?;

        Ok(Some(CopyCodes {
            length_symbol,
            length_extra,
            length_extra_bits,
            distance_symbol,
            distance_extra,
            distance_extra_bits,
        }))
    }
}

/// Turn raw bytes into a literal-only symbol stream
pub fn literals(data: &[u8]) -> Vec<Symbol> {
    data.iter().map(|&b| Symbol::Literal(b)).collect()
}
