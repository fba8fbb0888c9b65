//! Export of a parsed netlist to the circuit simulator's JSON format.

pub mod normalize;
pub mod simulator;

pub use simulator::{to_simulator, Component, Position, SimWire, SimulatorCircuit, Terminal};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::SketchError;
use crate::ir::Netlist;

/// Options for simulator export.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Run the layout clean-up passes.
    pub normalize: bool,
    /// Size the first gate is scaled to.
    pub reference_size: (i32, i32),
    /// Interior wire points turning less than this (degrees) are dropped.
    pub min_turn_angle: f64,
    /// Canvas the circuit is centered in.
    pub window: (f64, f64),
    pub grid_size: f64,
    /// Wire points closer than this to the previous kept point are dropped.
    pub min_point_spacing: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            reference_size: (65, 60),
            min_turn_angle: 45.0,
            window: (1280.0, 720.0),
            grid_size: 10.0,
            min_point_spacing: 10.0,
        }
    }
}

/// Converts a netlist to simulator form, normalizing the layout unless
/// disabled.
pub fn export_simulator(netlist: &Netlist, opts: &ExportOptions) -> SimulatorCircuit {
    if !opts.normalize {
        return to_simulator(netlist);
    }
    let scaled = normalize::scale_to_reference(netlist, opts.reference_size);
    let circuit = to_simulator(&scaled);
    let circuit = normalize::simplify_turns(&circuit, opts.min_turn_angle);
    let circuit = normalize::relocate(&circuit, opts.window);
    let circuit = normalize::snap_to_grid(&circuit, opts.grid_size);
    let circuit = normalize::remove_duplicate_points(&circuit);
    normalize::remove_close_points(&circuit, opts.min_point_spacing)
}

/// Writes a simulator document as pretty JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_simulator_json(path: &Path, circuit: &SimulatorCircuit) -> Result<(), SketchError> {
    let file = File::create(path).map_err(SketchError::Io)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, circuit).map_err(|source| SketchError::ExportJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}
