//! Fuzz target for netlist JSON parsing.
//!
//! Anything that parses is also run through Boolean synthesis, which must
//! not panic on dangling ids or cyclic gate graphs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchlogic::boolean::synthesize;
use sketchlogic::ir::io_json::netlist_from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(netlist) = netlist_from_json_slice(data) {
        let _ = synthesize(&netlist).lines();
    }
});
