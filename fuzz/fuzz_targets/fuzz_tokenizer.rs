#![no_main]

use libfuzzer_sys::fuzz_target;
use lineq::{Cursor, Tokenizer};

fuzz_target!(|data: &[u8]| {
    // Limit input size to prevent hangs
    if data.len() > 100000 {
        return;
    }

    let tokenizer = Tokenizer::new();
    let mut cursor = Cursor::new();

    // Tokenize each line; errors are fine, panics are not
    for line in data.split_inclusive(|&b| b == b'\n') {
        let _ = tokenizer.tokenize(line, 1, &mut cursor);
    }
});
