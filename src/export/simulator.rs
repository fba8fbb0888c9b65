//! Netlist to circuit-simulator JSON.
//!
//! The simulator wants `Components` with per-terminal wire ids and a flat
//! `Wires` list of polylines, all in PascalCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::{GateType, Netlist, Point, Role, WireId};

/// Offset of the i-th input terminal from the component origin.
const INPUT_TERMINAL_X: f64 = -20.0;
const INPUT_TERMINAL_Y0: f64 = 20.0;
const INPUT_TERMINAL_PITCH: f64 = 20.0;
/// Offset of the output terminal.
const OUTPUT_TERMINAL: Position = Position { x: 80.0, y: 30.0 };

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Position::new(f64::from(p.x), f64::from(p.y))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Terminal {
    pub position: Position,
    pub connected_wire_ids: Vec<WireId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Component {
    #[serde(rename = "Type")]
    pub kind: String,
    pub terminals: Vec<Terminal>,
    pub input_line_count: usize,
    pub selection_line_count: usize,
    pub x: f64,
    pub y: f64,
    pub stored_states: BTreeMap<String, serde_json::Value>,
    pub rotation: f64,
    pub is_selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimWire {
    pub id: WireId,
    pub value: Option<bool>,
    pub points: Vec<Position>,
}

/// A whole simulator document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulatorCircuit {
    pub components: Vec<Component>,
    pub wires: Vec<SimWire>,
}

impl SimulatorCircuit {
    /// Every coordinate in the document, terminals in absolute space.
    pub fn positions(&self) -> Vec<Position> {
        let mut all = Vec::new();
        for c in &self.components {
            all.push(Position::new(c.x, c.y));
            all.extend(
                c.terminals
                    .iter()
                    .map(|t| Position::new(t.position.x + c.x, t.position.y + c.y)),
            );
        }
        for w in &self.wires {
            all.extend(w.points.iter().copied());
        }
        all
    }
}

/// Simulator component name for a gate type.
pub fn component_kind(gate_type: GateType) -> &'static str {
    match gate_type {
        GateType::And => "AndGate",
        GateType::Or => "OrGate",
        GateType::Not => "NotGate",
        GateType::Xor => "XorGate",
        GateType::Nand => "NandGate",
        GateType::Nor => "NorGate",
        GateType::Xnor => "XnorGate",
    }
}

/// Converts a netlist into the simulator's document shape.
///
/// Each component gets `num_inputs` input terminals, filled with its input
/// wires in connection order, followed by one output terminal.
pub fn to_simulator(netlist: &Netlist) -> SimulatorCircuit {
    let components = netlist
        .gates
        .iter()
        .map(|gate| {
            let inputs: Vec<&WireId> = gate
                .connections_with_role(Role::Input)
                .map(|c| &c.wire)
                .collect();
            let output = gate.connections_with_role(Role::Output).map(|c| &c.wire).next();

            let mut terminals: Vec<Terminal> = (0..gate.num_inputs)
                .map(|i| Terminal {
                    position: Position::new(
                        INPUT_TERMINAL_X,
                        INPUT_TERMINAL_Y0 + i as f64 * INPUT_TERMINAL_PITCH,
                    ),
                    connected_wire_ids: inputs.get(i).map(|w| vec![(*w).clone()]).unwrap_or_default(),
                })
                .collect();
            terminals.push(Terminal {
                position: OUTPUT_TERMINAL,
                connected_wire_ids: output.into_iter().cloned().collect(),
            });

            Component {
                kind: component_kind(gate.gate_type).to_string(),
                terminals,
                input_line_count: gate.num_inputs,
                selection_line_count: 0,
                x: f64::from(gate.x),
                y: f64::from(gate.y),
                stored_states: BTreeMap::new(),
                rotation: f64::from(gate.rotation.degrees()),
                is_selected: false,
            }
        })
        .collect();

    let wires = netlist
        .wires
        .iter()
        .map(|(id, wire)| SimWire {
            id: id.clone(),
            value: None,
            points: wire.points.iter().copied().map(Position::from).collect(),
        })
        .collect();

    SimulatorCircuit { components, wires }
}
