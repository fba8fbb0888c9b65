//! Fuzz target for gate placement from arbitrary detections JSON.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchlogic::ir::io_json::detections_from_json_slice;
use sketchlogic::pipeline::fuzz_place_gates;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(detections) = detections_from_json_slice(data) {
        let placed = fuzz_place_gates(&detections);
        assert!(placed <= detections.len());
    }
});
