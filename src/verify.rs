//! Round-trip verification against an independent decoder.

use libdeflater::Decompressor;

use crate::error::{Error, Result};

/// Decompress a gzip member with libdeflate and compare it with `original`.
///
/// libdeflate also checks the trailer CRC-32 and length.
pub fn verify_gzip(compressed: &[u8], original: &[u8]) -> Result<()> {
    let mut decompressor = Decompressor::new();
    // Room for one extra byte so overlong output is caught as a size mismatch
    let mut decoded = vec![0u8; original.len() + 1];

    let n = decompressor
        .gzip_decompress(compressed, &mut decoded)
        .map_err(|e| Error::VerifyFailed(e.to_string()))?;

    if n != original.len() {
        return Err(Error::SizeMismatch { expected: original.len(), found: n });
    }
    if let Some(offset) = decoded[..n].iter().zip(original).position(|(a, b)| a != b) {
        return Err(Error::ContentMismatch { offset });
    }
    Ok(())
}
