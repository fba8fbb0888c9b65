//! Data model for sketchlogic.
//!
//! This module defines the typed representation that flows through the
//! pipeline: detector input ([`GateDetection`]), pixel geometry ([`Point`],
//! [`GateBox`]), and the finished [`Netlist`] handed to rendering and to the
//! Boolean synthesizer.
//!
//! # Design Principles
//!
//! 1. **Arena-style references**: gates and wires refer to each other through
//!    [`GateId`] and [`WireId`] only.
//!
//! 2. **Tagged connection targets**: a terminal's far end is a
//!    [`ConnectionTarget`] variant, decided once and never reinterpreted by
//!    position.
//!
//! 3. **Permissive construction**: detections may carry degenerate boxes or
//!    undecodable labels, so that validation and the pipeline report them
//!    instead of failing to parse.
//!
//! # Example
//!
//! ```
//! use sketchlogic::ir::{decode_label, GateBox, GateDetection, GateType};
//!
//! let det = GateDetection::new(1u64, "AND_0", GateBox::new(250, 100, 100, 200));
//! let (gate_type, _rotation) = decode_label(&det.label).unwrap();
//! assert_eq!(gate_type, GateType::And);
//! ```

mod bbox;
mod coord;
mod ids;
pub mod io_csv;
pub mod io_json;
mod label;
mod model;

// Re-export core types for convenient access
pub use bbox::GateBox;
pub use coord::Point;
pub use ids::{GateId, WireId};
pub use label::{decode_label, GateType, LabelDecodeError, Rotation};
pub use model::{
    Connection, ConnectionTarget, ExternalKind, Gate, GateDetection, Marker, Netlist, PlacedGate,
    RejectedDetection, Role, TerminalRef, Wire,
};
