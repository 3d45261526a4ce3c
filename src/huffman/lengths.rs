use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::tables::{placeholder_distance_lengths, placeholder_literal_lengths};
use crate::deflate::tables::{
    END_OF_BLOCK, MAX_CODE_LENGTH, MAX_DISTANCE_CODES, MAX_LITERAL_CODES, MIN_LITERAL_CODES,
};
use crate::deflate::Symbol;
use crate::error::Result;
use crate::LengthStrategy;

/// Frequency counter for dynamic Huffman code generation
#[derive(Clone, Debug)]
pub struct FrequencyCounter {
    /// Frequencies for literal (0-255), EOB (256), and length codes (257-285)
    pub literal_freq: [u32; MAX_LITERAL_CODES],
    /// Frequencies for distance codes (0-29)
    pub distance_freq: [u32; MAX_DISTANCE_CODES],
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self { literal_freq: [0; MAX_LITERAL_CODES], distance_freq: [0; MAX_DISTANCE_CODES] }
    }

    /// Count symbol frequencies; the end-of-block marker is counted once
    pub fn count_symbols(&mut self, symbols: &[Symbol]) -> Result<()> {
        for symbol in symbols {
            if let Symbol::Literal(byte) = symbol {
                self.literal_freq[*byte as usize] += 1;
            } else if let Some(copy) = symbol.copy_codes()? {
                self.literal_freq[copy.length_symbol as usize] += 1;
                self.distance_freq[copy.distance_symbol as usize] += 1;
            }
        }
        self.literal_freq[END_OF_BLOCK as usize] = self.literal_freq[END_OF_BLOCK as usize].max(1);
        Ok(())
    }

    /// Number of literal/length codes needed (HLIT + 257)
    pub fn num_literal_codes(&self) -> usize {
        let last = (MIN_LITERAL_CODES..MAX_LITERAL_CODES)
            .rev()
            .find(|&i| self.literal_freq[i] > 0)
            .unwrap_or(END_OF_BLOCK as usize);
        last + 1
    }

    /// Number of distance codes used; 0 when the block has no back-references
    pub fn num_distance_codes(&self) -> usize {
        self.distance_freq.iter().rposition(|&f| f > 0).map_or(0, |last| last + 1)
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Literal/length and distance code lengths for one block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockLengths {
    pub literal: Vec<u8>,
    pub distance: Vec<u8>,
}

impl BlockLengths {
    /// Choose code lengths for a block's symbol stream
    pub fn for_symbols(strategy: LengthStrategy, symbols: &[Symbol]) -> Result<Self> {
        match strategy {
            LengthStrategy::Placeholder => Ok(Self::placeholder()),
            LengthStrategy::Adaptive => Self::adaptive(symbols),
        }
    }

    /// The fixed 8/9-bit literal and 4/5-bit distance tables
    pub fn placeholder() -> Self {
        Self {
            literal: placeholder_literal_lengths().to_vec(),
            distance: placeholder_distance_lengths().to_vec(),
        }
    }

    /// Huffman lengths fitted to the block's own symbol frequencies
    pub fn adaptive(symbols: &[Symbol]) -> Result<Self> {
        let mut freq = FrequencyCounter::new();
        freq.count_symbols(symbols)?;

        let mut literal_freq = freq.literal_freq[..freq.num_literal_codes()].to_vec();

        // A lone end-of-block would get a one-symbol code; add a partner to keep it complete
        if literal_freq.iter().filter(|&&f| f > 0).count() < 2 {
            if let Some(spare) = literal_freq.iter().position(|&f| f == 0) {
                literal_freq[spare] = 1;
            }
        }

        let literal = compute_code_lengths(&literal_freq, MAX_CODE_LENGTH);
        let distance =
            compute_code_lengths(&freq.distance_freq[..freq.num_distance_codes()], MAX_CODE_LENGTH);

        Ok(Self { literal, distance })
    }
}

/// Compute Huffman code lengths for given frequencies, limited to `max_bits`.
///
/// Returns a vector of code lengths (0 for unused symbols). With two or more
/// used symbols the result is always a complete code.
pub fn compute_code_lengths(frequencies: &[u32], max_bits: u8) -> Vec<u8> {
    let n = frequencies.len();
    let mut lengths = vec![0u8; n];

    // Collect symbols with non-zero frequency
    let symbols: Vec<(usize, u32)> =
        frequencies.iter().enumerate().filter(|(_, &f)| f > 0).map(|(i, &f)| (i, f)).collect();

    match symbols.len() {
        0 => return lengths,
        1 => {
            lengths[symbols[0].0] = 1;
            return lengths;
        }
        _ => {}
    }

    let depths = huffman_depths(&symbols);
    let limited = limit_depths(&depths, max_bits);

    // Hand the shortest lengths to the most frequent symbols
    let mut order: Vec<usize> = (0..symbols.len()).collect();
    order.sort_by(|&a, &b| {
        depths[a].cmp(&depths[b]).then(symbols[b].1.cmp(&symbols[a].1)).then(a.cmp(&b))
    });

    for (&leaf, &len) in order.iter().zip(&limited) {
        lengths[symbols[leaf].0] = len;
    }

    lengths
}

/// Unconstrained Huffman tree depth of each leaf, in `symbols` order
fn huffman_depths(symbols: &[(usize, u32)]) -> Vec<u32> {
    let leaves = symbols.len();

    // Node ids: leaves first, then internal nodes in creation order. Ties on
    // frequency break on id so the tree is deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> =
        symbols.iter().enumerate().map(|(id, &(_, freq))| Reverse((freq as u64, id))).collect();
    let mut parent = vec![usize::MAX; 2 * leaves - 1];
    let mut next_id = leaves;

    while let (Some(Reverse((fa, a))), Some(Reverse((fb, b)))) = (heap.pop(), heap.pop()) {
        parent[a] = next_id;
        parent[b] = next_id;
        heap.push(Reverse((fa + fb, next_id)));
        next_id += 1;
    }

    // Parents always have larger ids than their children, so one reverse sweep suffices
    let root = next_id - 1;
    let mut depth = vec![0u32; next_id];
    for id in (0..root).rev() {
        depth[id] = depth[parent[id]] + 1;
    }

    depth.truncate(leaves);
    depth
}

/// Clamp depths to `max_bits` and repair the Kraft sum.
///
/// Returns the limited lengths sorted ascending, one per leaf.
fn limit_depths(depths: &[u32], max_bits: u8) -> Vec<u8> {
    let max = max_bits as usize;
    let mut bl_count = vec![0u64; max + 1];
    for &d in depths {
        bl_count[(d as usize).min(max)] += 1;
    }

    // Code space in units of 2^-max_bits
    let target = 1u64 << max;
    let mut total: u64 = (1..=max).map(|bits| bl_count[bits] << (max - bits)).sum();

    // Each pass drops one max-length code and splits a shorter one in two:
    // the leaf count is unchanged and the total shrinks by one unit.
    while total > target {
        bl_count[max] -= 1;
        if let Some(bits) = (1..max).rev().find(|&b| bl_count[b] > 0) {
            bl_count[bits] -= 1;
            bl_count[bits + 1] += 2;
        }
        total -= 1;
    }

    bl_count
        .iter()
        .enumerate()
        .skip(1)
        .flat_map(|(bits, &count)| std::iter::repeat(bits as u8).take(count as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kraft_units(lengths: &[u8]) -> u64 {
        lengths.iter().filter(|&&l| l > 0).map(|&l| 1u64 << (15 - l)).sum()
    }

    #[test]
    fn test_frequency_counter() {
        let mut freq = FrequencyCounter::new();
        let symbols = vec![
            Symbol::Literal(b'a'),
            Symbol::Literal(b'a'),
            Symbol::Literal(b'b'),
            Symbol::Copy { length: 3, distance: 1 },
        ];
        freq.count_symbols(&symbols).unwrap();

        assert_eq!(freq.literal_freq[b'a' as usize], 2);
        assert_eq!(freq.literal_freq[b'b' as usize], 1);
        assert_eq!(freq.literal_freq[256], 1);
        // Length 3 -> code 257, distance 1 -> code 0
        assert_eq!(freq.literal_freq[257], 1);
        assert_eq!(freq.distance_freq[0], 1);
        assert_eq!(freq.num_literal_codes(), 258);
        assert_eq!(freq.num_distance_codes(), 1);
    }

    #[test]
    fn test_frequency_counter_literals_only() {
        let mut freq = FrequencyCounter::new();
        freq.count_symbols(&[Symbol::Literal(0)]).unwrap();
        assert_eq!(freq.num_literal_codes(), 257);
        assert_eq!(freq.num_distance_codes(), 0);
    }

    #[test]
    fn test_compute_code_lengths_equal() {
        let lengths = compute_code_lengths(&[1, 1, 1, 1], 15);
        assert_eq!(lengths, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_compute_code_lengths_skewed() {
        let lengths = compute_code_lengths(&[100, 1, 1, 1], 15);
        assert_eq!(lengths[0], 1);
        assert!(lengths[1..].iter().all(|&l| l >= lengths[0]));
        assert_eq!(kraft_units(&lengths), 1 << 15);
    }

    #[test]
    fn test_compute_code_lengths_degenerate() {
        assert_eq!(compute_code_lengths(&[], 15), Vec::<u8>::new());
        assert_eq!(compute_code_lengths(&[0, 0], 15), vec![0, 0]);
        assert_eq!(compute_code_lengths(&[0, 9, 0], 15), vec![0, 1, 0]);
        assert_eq!(compute_code_lengths(&[5, 0, 9], 15), vec![1, 0, 1]);
    }

    #[test]
    fn test_length_limit_enforced() {
        // Fibonacci frequencies produce a maximally deep tree
        let mut freqs = vec![1u32, 1];
        while freqs.len() < 30 {
            let next = freqs[freqs.len() - 1] + freqs[freqs.len() - 2];
            freqs.push(next);
        }

        let unlimited = compute_code_lengths(&freqs, 32);
        assert!(unlimited.iter().copied().max().unwrap() > 15);

        for max_bits in [7u8, 9, 15] {
            let lengths = compute_code_lengths(&freqs, max_bits);
            assert!(lengths.iter().all(|&l| l >= 1 && l <= max_bits));
            assert_eq!(kraft_units(&lengths), 1 << 15, "max_bits {}", max_bits);
            // Most frequent symbol never gets a longer code than the least frequent
            assert!(lengths[29] <= lengths[0]);
        }
    }

    #[test]
    fn test_adaptive_lengths_complete() {
        let symbols: Vec<Symbol> = b"abracadabra".iter().map(|&b| Symbol::Literal(b)).collect();
        let lengths = BlockLengths::adaptive(&symbols).unwrap();

        assert_eq!(lengths.literal.len(), 257);
        assert!(lengths.literal[256] > 0);
        assert!(lengths.literal[b'a' as usize] <= lengths.literal[b'd' as usize]);
        assert_eq!(kraft_units(&lengths.literal), 1 << 15);
        assert!(lengths.distance.is_empty());
    }

    #[test]
    fn test_adaptive_empty_block() {
        let lengths = BlockLengths::adaptive(&[]).unwrap();
        assert_eq!(lengths.literal[0], 1);
        assert_eq!(lengths.literal[256], 1);
        assert_eq!(kraft_units(&lengths.literal), 1 << 15);
    }

    #[test]
    fn test_adaptive_with_copies() {
        let symbols = vec![
            Symbol::Literal(b'x'),
            Symbol::Copy { length: 10, distance: 1 },
            Symbol::Copy { length: 258, distance: 1 },
        ];
        let lengths = BlockLengths::adaptive(&symbols).unwrap();
        assert_eq!(lengths.literal.len(), 286);
        assert!(lengths.literal[264] > 0);
        assert!(lengths.literal[285] > 0);
        assert_eq!(lengths.distance, vec![1]);
    }

    #[test]
    fn test_placeholder_strategy_ignores_symbols() {
        let lengths = BlockLengths::for_symbols(LengthStrategy::Placeholder, &[]).unwrap();
        assert_eq!(lengths, BlockLengths::placeholder());
        assert_eq!(lengths.literal.len(), 286);
        assert_eq!(lengths.distance.len(), 30);
    }
}
