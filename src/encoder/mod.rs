pub mod block;
pub mod chunker;
pub mod parallel;
pub mod single;

pub use block::BlockEncoder;
pub use chunker::{BlockChunker, Chunk};
pub use parallel::ParallelEncoder;
pub use single::SingleThreadedEncoder;
