use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Code-length table errors
    #[error("Invalid code-length table: {0}")]
    InvalidLengthTable(String),

    #[error("Literal/length table too short: {0} entries (need at least 257)")]
    LengthTableTooShort(usize),

    #[error("Huffman code incomplete: {alphabet} lengths leave unused code space")]
    IncompleteCodeTable { alphabet: &'static str },

    #[error("Huffman code oversubscribed: {alphabet} lengths exceed available code space")]
    OversubscribedCodeTable { alphabet: &'static str },

    // Symbol stream errors
    #[error("Symbol {symbol} has no code in the {alphabet} alphabet")]
    SymbolNotEncodable { symbol: u16, alphabet: &'static str },

    #[error("Invalid back-reference: length {length}, distance {distance}")]
    InvalidCopy { length: u16, distance: u16 },

    // Configuration errors
    #[error("Invalid block size: {0} (must be at least 1)")]
    InvalidBlockSize(usize),

    // Verification errors
    #[error("Verification failed: {0}")]
    VerifyFailed(String),

    #[error("Size mismatch: expected {expected} bytes, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("Content mismatch at byte offset {offset}")]
    ContentMismatch { offset: usize },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
