//! Fuzz target for detections CSV parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchlogic::ir::io_csv::detections_from_csv_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = detections_from_csv_slice(data);
});
