#![no_main]

use dyngz::{compress, ClEncoding, EncodeConfig, LengthStrategy};
use flate2::read::GzDecoder;
use libfuzzer_sys::fuzz_target;
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the configuration, the rest is the payload
    let selector = data[0];
    let payload = &data[1..];

    let config = EncodeConfig {
        block_size: 1 + (selector as usize >> 2) * 97,
        length_strategy: if selector & 1 == 0 {
            LengthStrategy::Placeholder
        } else {
            LengthStrategy::Adaptive
        },
        cl_encoding: if selector & 2 == 0 { ClEncoding::Direct } else { ClEncoding::RunLength },
        ..Default::default()
    };

    let gz = compress(payload, config).expect("encoding valid input must succeed");

    let mut decoded = Vec::new();
    GzDecoder::new(gz.as_slice()).read_to_end(&mut decoded).expect("output must inflate");
    assert_eq!(decoded, payload);
});
