/// Length symbols 257-285: base length and extra bits, indexed by (symbol - 257)
pub const LENGTH_TABLE: [(u16, u8); 29] = [
    // (base_length, extra_bits)
    (3, 0),   // 257
    (4, 0),   // 258
    (5, 0),   // 259
    (6, 0),   // 260
    (7, 0),   // 261
    (8, 0),   // 262
    (9, 0),   // 263
    (10, 0),  // 264
    (11, 1),  // 265
    (13, 1),  // 266
    (15, 1),  // 267
    (17, 1),  // 268
    (19, 2),  // 269
    (23, 2),  // 270
    (27, 2),  // 271
    (31, 2),  // 272
    (35, 3),  // 273
    (43, 3),  // 274
    (51, 3),  // 275
    (59, 3),  // 276
    (67, 4),  // 277
    (83, 4),  // 278
    (99, 4),  // 279
    (115, 4), // 280
    (131, 5), // 281
    (163, 5), // 282
    (195, 5), // 283
    (227, 5), // 284
    (258, 0), // 285 - special case
];

/// Distance symbols 0-29: base distance and extra bits
pub const DISTANCE_TABLE: [(u16, u8); 30] = [
    // (base_distance, extra_bits)
    (1, 0),      // 0
    (2, 0),      // 1
    (3, 0),      // 2
    (4, 0),      // 3
    (5, 1),      // 4
    (7, 1),      // 5
    (9, 2),      // 6
    (13, 2),     // 7
    (17, 3),     // 8
    (25, 3),     // 9
    (33, 4),     // 10
    (49, 4),     // 11
    (65, 5),     // 12
    (97, 5),     // 13
    (129, 6),    // 14
    (193, 6),    // 15
    (257, 7),    // 16
    (385, 7),    // 17
    (513, 8),    // 18
    (769, 8),    // 19
    (1025, 9),   // 20
    (1537, 9),   // 21
    (2049, 10),  // 22
    (3073, 10),  // 23
    (4097, 11),  // 24
    (6145, 11),  // 25
    (8193, 12),  // 26
    (12289, 12), // 27
    (16385, 13), // 28
    (24577, 13), // 29
];

/// End-of-block symbol in the literal/length alphabet
pub const END_OF_BLOCK: u16 = 256;

/// Longest code permitted in the literal/length and distance alphabets
pub const MAX_CODE_LENGTH: u8 = 15;

/// Longest code permitted in the code-length alphabet
pub const MAX_CL_CODE_LENGTH: u8 = 7;

/// Literal/length table size bounds (HLIT + 257)
pub const MIN_LITERAL_CODES: usize = 257;
pub const MAX_LITERAL_CODES: usize = 286;

/// Distance table size bound (HDIST + 1)
pub const MAX_DISTANCE_CODES: usize = 30;

/// Size of the code-length alphabet (symbols 0-18)
pub const NUM_CL_SYMBOLS: usize = 19;

/// Order in which code-length alphabet lengths are transmitted (RFC 1951 3.2.7)
pub const CODE_LENGTH_ORDER: [usize; NUM_CL_SYMBOLS] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Find the bucket of a base/extra-bits table holding `value`.
/// Returns (bucket index, extra value, extra bit count).
fn find_bucket(table: &[(u16, u8)], value: u16) -> Option<(usize, u16, u8)> {
    table.iter().enumerate().find_map(|(i, &(base, extra_bits))| {
        let span = (1u32 << extra_bits) - 1;
        let top = base as u32 + span;
        (value >= base && value as u32 <= top).then(|| (i, value - base, extra_bits))
    })
}

/// Map a match length (3-258) to its length symbol (257-285).
/// Returns (symbol, extra value, extra bit count).
pub fn encode_length(length: u16) -> Option<(u16, u16, u8)> {
    if !(3..=258).contains(&length) {
        return None;
    }

    // 258 has its own symbol even though 284 + 31 could reach it
    if length == 258 {
        return Some((285, 0, 0));
    }

    find_bucket(&LENGTH_TABLE, length).map(|(i, extra, bits)| (i as u16 + 257, extra, bits))
}

/// Map a match distance (1-32768) to its distance symbol (0-29).
/// Returns (symbol, extra value, extra bit count).
pub fn encode_distance(distance: u16) -> Option<(u16, u16, u8)> {
    if distance == 0 || distance > 32768 {
        return None;
    }

    find_bucket(&DISTANCE_TABLE, distance).map(|(i, extra, bits)| (i as u16, extra, bits))
}
