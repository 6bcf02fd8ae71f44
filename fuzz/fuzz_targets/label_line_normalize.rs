//! Fuzz target for label line normalization.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the normalizer, checking for
//! panics and that every accepted line renders to a stable fixed point.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yolo_curate::label::fuzz_normalize_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_normalize_line(line);
});
