#![no_main]

use dyngz::deflate::tokens::literals;
use dyngz::{BitWriter, BlockSerializer, ClEncoding, CodeTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Arbitrary length tables: invalid ones must be rejected, never panic
    let split = (data[0] as usize).min(data.len() - 1);
    let literal: Vec<u8> = data[1..].iter().map(|b| b % 16).collect();
    let distance: Vec<u8> = data[1..1 + split].iter().map(|b| b % 16).collect();

    let (Ok(literal), Ok(distance)) =
        (CodeTable::from_lengths(&literal), CodeTable::from_lengths(&distance))
    else {
        return;
    };

    for cl_encoding in [ClEncoding::Direct, ClEncoding::RunLength] {
        let mut writer = BitWriter::new();
        let result = BlockSerializer::new(cl_encoding).emit_block(
            &mut writer,
            &literal,
            &distance,
            &literals(b"fuzz"),
            true,
        );
        if result.is_err() {
            assert!(writer.is_empty());
        }
    }
});
