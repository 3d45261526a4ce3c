use crate::bits::BitSink;
use crate::deflate::tokens::literals;
use crate::deflate::{BlockSerializer, ClEncoding};
use crate::error::Result;
use crate::huffman::{BlockLengths, CodeTable};
use crate::LengthStrategy;

/// Turns one chunk of input into one dynamic Huffman block
///
/// Placeholder tables are the same for every block, so their canonical codes
/// are built once up front.
#[derive(Clone, Debug)]
pub struct BlockEncoder {
    serializer: BlockSerializer,
    fixed_tables: Option<(CodeTable, CodeTable)>,
}

impl BlockEncoder {
    pub fn new(strategy: LengthStrategy, cl_encoding: ClEncoding) -> Result<Self> {
        let fixed_tables = match strategy {
            LengthStrategy::Placeholder => {
                let lengths = BlockLengths::placeholder();
                Some((
                    CodeTable::from_lengths(&lengths.literal)?,
                    CodeTable::from_lengths(&lengths.distance)?,
                ))
            }
            LengthStrategy::Adaptive => None,
        };
        Ok(Self { serializer: BlockSerializer::new(cl_encoding), fixed_tables })
    }

    /// Emit `data` as a literal-only block
    pub fn encode<S: BitSink + ?Sized>(
        &self,
        sink: &mut S,
        data: &[u8],
        is_final: bool,
    ) -> Result<()> {
        let symbols = literals(data);

        match &self.fixed_tables {
            Some((literal, distance)) => {
                self.serializer.emit_block(sink, literal, distance, &symbols, is_final)
            }
            None => {
                let lengths = BlockLengths::adaptive(&symbols)?;
                let literal = CodeTable::from_lengths(&lengths.literal)?;
                let distance = CodeTable::from_lengths(&lengths.distance)?;
                self.serializer.emit_block(sink, &literal, &distance, &symbols, is_final)
            }
        }
    }
}
