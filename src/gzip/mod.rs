pub mod header;

pub use header::{GzipHeader, GzipTrailer, OS_UNIX};
