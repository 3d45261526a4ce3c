pub mod canonical;
pub mod lengths;
pub mod tables;

pub use canonical::{build_codes, check_completeness, CodeTable};
pub use lengths::{compute_code_lengths, BlockLengths, FrequencyCounter};
