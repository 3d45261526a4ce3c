//! Dynamic Huffman block serialization (RFC 1951 section 3.2.7).
//!
//! A block-type-2 unit is written in two phases, mirroring how a decoder
//! reads it: first the header and the code-length tables that let the decoder
//! rebuild both canonical codes, then the symbol stream coded with them.
//! Every precondition is checked before the first bit goes out, so a failed
//! call leaves the sink untouched.

use super::tables::{
    CODE_LENGTH_ORDER, END_OF_BLOCK, MAX_CL_CODE_LENGTH, MAX_DISTANCE_CODES, MAX_LITERAL_CODES,
    MIN_LITERAL_CODES, NUM_CL_SYMBOLS,
};
use super::tokens::Symbol;
use crate::bits::BitSink;
use crate::error::{Error, Result};
use crate::huffman::lengths::compute_code_lengths;
use crate::huffman::tables::FLAT_CL_LENGTHS;
use crate::huffman::{check_completeness, CodeTable};

/// BTYPE value for dynamic Huffman blocks
const BTYPE_DYNAMIC: u32 = 2;

/// Minimum number of code-length alphabet entries in the header (HCLEN + 4)
const MIN_CL_CODES: usize = 4;

/// How the literal/length and distance code lengths are transmitted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClEncoding {
    /// Every length sent as its own symbol through a fixed flat code
    /// (4 bits for 0-12, 5 bits for 13-18); all 19 alphabet entries declared
    #[default]
    Direct,
    /// Runs collapsed with symbols 16/17/18 and a code-length code fitted to
    /// the resulting symbol frequencies
    RunLength,
}

/// Writes complete dynamic Huffman blocks onto a bit sink
#[derive(Clone, Debug, Default)]
pub struct BlockSerializer {
    cl_encoding: ClEncoding,
}

/// Everything needed to write the block header, computed up front
struct HeaderPlan {
    hlit: u32,
    hdist: u32,
    /// Number of code-length alphabet entries transmitted (HCLEN + 4)
    cl_count: usize,
    cl_table: CodeTable,
    /// Code-length alphabet symbols with their repeat-count extra values
    items: Vec<(u8, u8)>,
}

impl BlockSerializer {
    pub fn new(cl_encoding: ClEncoding) -> Self {
        Self { cl_encoding }
    }

    pub fn cl_encoding(&self) -> ClEncoding {
        self.cl_encoding
    }

    /// Emit one complete block: header, code-length tables, symbols, end-of-block.
    pub fn emit_block<S: BitSink + ?Sized>(
        &self,
        sink: &mut S,
        literal: &CodeTable,
        distance: &CodeTable,
        symbols: &[Symbol],
        is_final: bool,
    ) -> Result<()> {
        validate_tables(literal, distance)?;
        let plan = self.plan_header(literal.lengths(), distance.lengths())?;
        for symbol in symbols {
            check_symbol(literal, distance, symbol)?;
        }

        sink.write_bit(is_final); // BFINAL
        sink.write_bits(BTYPE_DYNAMIC, 2); // BTYPE = 10
        plan.write(sink)?;

        for symbol in symbols {
            write_symbol(sink, literal, distance, symbol)?;
        }

        let (code, len) = lookup(literal, END_OF_BLOCK, LITERAL_ALPHABET)?;
        sink.write_code(code, len);

        Ok(())
    }

    fn plan_header(&self, literal: &[u8], distance: &[u8]) -> Result<HeaderPlan> {
        let hlit = (literal.len() - MIN_LITERAL_CODES) as u32;
        // At least one distance length is always transmitted
        let hdist = (distance.len().max(1) - 1) as u32;
        let distance: &[u8] = if distance.is_empty() { &[0] } else { distance };

        let (cl_lengths, items) = match self.cl_encoding {
            ClEncoding::Direct => {
                let items: Vec<(u8, u8)> =
                    literal.iter().chain(distance).map(|&len| (len, 0)).collect();
                (FLAT_CL_LENGTHS.to_vec(), items)
            }
            ClEncoding::RunLength => {
                let combined: Vec<u8> = literal.iter().chain(distance).copied().collect();
                let items = rle_encode_lengths(&combined);

                let mut cl_freq = [0u32; NUM_CL_SYMBOLS];
                for &(sym, _) in &items {
                    cl_freq[sym as usize] += 1;
                }
                (compute_code_lengths(&cl_freq, MAX_CL_CODE_LENGTH), items)
            }
        };

        check_completeness(&cl_lengths, CL_ALPHABET)?;
        let cl_table = CodeTable::from_lengths(&cl_lengths)?;

        // Trailing zero entries of the permuted order need not be sent
        let cl_count = CODE_LENGTH_ORDER
            .iter()
            .rposition(|&sym| cl_lengths[sym] > 0)
            .map_or(MIN_CL_CODES, |last| (last + 1).max(MIN_CL_CODES));

        Ok(HeaderPlan { hlit, hdist, cl_count, cl_table, items })
    }
}

impl HeaderPlan {
    fn write<S: BitSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write_bits(self.hlit, 5);
        sink.write_bits(self.hdist, 5);
        sink.write_bits((self.cl_count - MIN_CL_CODES) as u32, 4);

        // Code-length code lengths, 3 bits each, in permuted order
        let cl_lengths = self.cl_table.lengths();
        for &sym in CODE_LENGTH_ORDER.iter().take(self.cl_count) {
            sink.write_bits(cl_lengths[sym] as u32, 3);
        }

        for &(sym, extra) in &self.items {
            let (code, len) = lookup(&self.cl_table, sym as u16, CL_ALPHABET)?;
            sink.write_code(code, len);

            match sym {
                16 => sink.write_bits(extra as u32, 2), // 3-6 repeats
                17 => sink.write_bits(extra as u32, 3), // 3-10 zeros
                18 => sink.write_bits(extra as u32, 7), // 11-138 zeros
                _ => {}
            }
        }

        Ok(())
    }
}

const LITERAL_ALPHABET: &str = "literal/length";
const DISTANCE_ALPHABET: &str = "distance";
const CL_ALPHABET: &str = "code-length";

fn validate_tables(literal: &CodeTable, distance: &CodeTable) -> Result<()> {
    if literal.len() < MIN_LITERAL_CODES {
        return Err(Error::LengthTableTooShort(literal.len()));
    }
    if literal.len() > MAX_LITERAL_CODES {
        return Err(Error::InvalidLengthTable(format!(
            "{} literal/length codes (max {})",
            literal.len(),
            MAX_LITERAL_CODES
        )));
    }
    if distance.len() > MAX_DISTANCE_CODES {
        return Err(Error::InvalidLengthTable(format!(
            "{} distance codes (max {})",
            distance.len(),
            MAX_DISTANCE_CODES
        )));
    }
    if literal.get(END_OF_BLOCK as usize).is_none() {
        return Err(Error::InvalidLengthTable("end-of-block symbol 256 has no code".to_string()));
    }

    check_completeness(literal.lengths(), LITERAL_ALPHABET)?;
    check_completeness(distance.lengths(), DISTANCE_ALPHABET)
}

#[inline]
fn lookup(table: &CodeTable, symbol: u16, alphabet: &'static str) -> Result<(u32, u8)> {
    table.get(symbol as usize).ok_or(Error::SymbolNotEncodable { symbol, alphabet })
}

fn check_symbol(literal: &CodeTable, distance: &CodeTable, symbol: &Symbol) -> Result<()> {
    match *symbol {
        Symbol::Literal(byte) => lookup(literal, byte as u16, LITERAL_ALPHABET).map(|_| ()),
        Symbol::Copy { .. } => {
            if let Some(copy) = symbol.copy_codes()? {
                lookup(literal, copy.length_symbol, LITERAL_ALPHABET)?;
                lookup(distance, copy.distance_symbol, DISTANCE_ALPHABET)?;
            }
            Ok(())
        }
    }
}

/// Write one symbol; a back-reference goes out as length code, length extra
/// bits, distance code, distance extra bits
fn write_symbol<S: BitSink + ?Sized>(
    sink: &mut S,
    literal: &CodeTable,
    distance: &CodeTable,
    symbol: &Symbol,
) -> Result<()> {
    match *symbol {
        Symbol::Literal(byte) => {
            let (code, len) = lookup(literal, byte as u16, LITERAL_ALPHABET)?;
            sink.write_code(code, len);
        }
        Symbol::Copy { .. } => {
            if let Some(copy) = symbol.copy_codes()? {
                let (code, len) = lookup(literal, copy.length_symbol, LITERAL_ALPHABET)?;
                sink.write_code(code, len);
                sink.write_bits(copy.length_extra as u32, copy.length_extra_bits);

                let (code, len) = lookup(distance, copy.distance_symbol, DISTANCE_ALPHABET)?;
                sink.write_code(code, len);
                sink.write_bits(copy.distance_extra as u32, copy.distance_extra_bits);
            }
        }
    }
    Ok(())
}

/// RLE encode code lengths using symbols 16, 17, 18
fn rle_encode_lengths(lengths: &[u8]) -> Vec<(u8, u8)> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < lengths.len() {
        let len = lengths[i];
        let run_len = lengths[i..].iter().take_while(|&&l| l == len).count();
        let mut run = run_len;

        if len == 0 {
            while run > 0 {
                if run >= 11 {
                    let count = run.min(138);
                    result.push((18, (count - 11) as u8));
                    run -= count;
                } else if run >= 3 {
                    let count = run.min(10);
                    result.push((17, (count - 3) as u8));
                    run -= count;
                } else {
                    result.push((0, 0));
                    run -= 1;
                }
            }
        } else {
            // The first length is sent as-is; repeats refer back to it
            result.push((len, 0));
            run -= 1;

            while run > 0 {
                if run >= 3 {
                    let count = run.min(6);
                    result.push((16, (count - 3) as u8));
                    run -= count;
                } else {
                    result.push((len, 0));
                    run -= 1;
                }
            }
        }

        i += run_len;
    }

    result
}
