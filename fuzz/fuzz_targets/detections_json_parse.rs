//! Fuzz target for detections JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the detections JSON parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchlogic::ir::io_json::detections_from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = detections_from_json_slice(data);
});
