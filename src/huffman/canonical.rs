//! Canonical Huffman code construction (RFC 1951 section 3.2.2).
//!
//! A code is fully determined by its length table: shorter codes numerically
//! precede longer ones, and codes of equal length are handed out in order of
//! increasing symbol index. Decoders rebuild the same table from the same
//! lengths, so this assignment must be reproduced exactly.

use crate::deflate::tables::MAX_CODE_LENGTH;
use crate::error::{Error, Result};

/// Build canonical codes from a code-length table.
///
/// Entry `i` of the result holds the code for symbol `i` in its low
/// `lengths[i]` bits, most significant bit first. Symbols of length 0 get 0.
pub fn build_codes(lengths: &[u8]) -> Result<Vec<u32>> {
    if let Some((symbol, &len)) = lengths.iter().enumerate().find(|(_, &l)| l > MAX_CODE_LENGTH)
    {
        return Err(Error::InvalidLengthTable(format!(
            "symbol {} has length {} (max {})",
            symbol, len, MAX_CODE_LENGTH
        )));
    }

    let max_bits = lengths.iter().copied().max().unwrap_or(0) as usize;

    // Count codes of each length; zero-length symbols have no code
    let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
    for &len in lengths {
        bl_count[len as usize] += 1;
    }
    bl_count[0] = 0;

    // Smallest code of each length
    let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
    let mut code = 0u32;
    for bits in 1..=max_bits {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    let mut codes = vec![0u32; lengths.len()];
    for (symbol, &len) in lengths.iter().enumerate() {
        if len > 0 {
            codes[symbol] = next_code[len as usize];
            next_code[len as usize] += 1;
        }
    }

    Ok(codes)
}

/// Check that a length table forms a complete prefix code.
///
/// Accepts the two degenerate tables every decoder handles: no codes at all,
/// and a single code of length 1. `alphabet` names the table in errors.
pub fn check_completeness(lengths: &[u8], alphabet: &'static str) -> Result<()> {
    // Code space measured in units of 2^-15
    let full = 1u64 << MAX_CODE_LENGTH;
    let mut used_space = 0u64;
    let mut used_symbols = 0usize;

    for &len in lengths.iter().filter(|&&l| l > 0) {
        if len > MAX_CODE_LENGTH {
            return Err(Error::InvalidLengthTable(format!(
                "{} length {} exceeds {}",
                alphabet, len, MAX_CODE_LENGTH
            )));
        }
        used_space += full >> len;
        used_symbols += 1;
    }

    if used_space > full {
        return Err(Error::OversubscribedCodeTable { alphabet });
    }
    if used_space < full && used_symbols > 1 {
        return Err(Error::IncompleteCodeTable { alphabet });
    }
    if used_symbols == 1 && used_space != full / 2 {
        return Err(Error::IncompleteCodeTable { alphabet });
    }
    Ok(())
}

/// Code lengths paired with their canonical codes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    lengths: Vec<u8>,
    codes: Vec<u32>,
}

impl CodeTable {
    /// Build the canonical code for a length table
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let codes = build_codes(lengths)?;
        Ok(Self { lengths: lengths.to_vec(), codes })
    }

    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Number of symbols in the alphabet (including unused ones)
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// (code, length) for a symbol, or `None` if it has no code
    #[inline]
    pub fn get(&self, symbol: usize) -> Option<(u32, u8)> {
        match self.lengths.get(symbol) {
            Some(&len) if len > 0 => Some((self.codes[symbol], len)),
            _ => None,
        }
    }
}
