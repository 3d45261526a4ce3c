pub mod serializer;
pub mod tables;
pub mod tokens;

pub use serializer::{BlockSerializer, ClEncoding};
pub use tokens::Symbol;
