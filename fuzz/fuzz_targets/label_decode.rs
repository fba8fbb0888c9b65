//! Fuzz target for gate label decoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchlogic::ir::decode_label;

fuzz_target!(|data: &[u8]| {
    if let Ok(label) = std::str::from_utf8(data) {
        let _ = decode_label(label);
    }
});
