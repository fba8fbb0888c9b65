//! Core netlist model.
//!
//! Gates and wires reference each other only through [`GateId`] and
//! [`WireId`], never through live references, so every pipeline stage can
//! take an immutable snapshot of the previous stage and return a new one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bbox::GateBox;
use super::coord::Point;
use super::ids::{GateId, WireId};
use super::label::{GateType, Rotation};

/// One gate as reported by the external detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateDetection {
    /// Detector-assigned id, unique within an image.
    pub id: GateId,

    /// Combined type and rotation label, e.g. `"AND_90"`.
    #[serde(rename = "type")]
    pub label: String,

    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,

    /// Detector confidence; carried through but never used by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl GateDetection {
    /// Creates a detection from a label and an XYWH box.
    pub fn new(id: impl Into<GateId>, label: impl Into<String>, bbox: GateBox) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            confidence: None,
        }
    }

    /// Adds a confidence score to the detection.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// The detection's bounding box.
    pub fn bbox(&self) -> GateBox {
        GateBox::new(self.x, self.y, self.width, self.height)
    }
}

/// A detection whose label decoded and whose box is well formed: the unit
/// every tracing stage works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedGate {
    pub id: GateId,
    pub gate_type: GateType,
    pub rotation: Rotation,
    pub bbox: GateBox,
}

/// Whether a terminal feeds the gate or is driven by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
}

/// Kind of external marker a dead-end wire was turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalKind {
    /// Externally driven input.
    Toggle,
    /// Externally observed output.
    Probe,
}

/// What the far end of a gate terminal is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    /// Another gate.
    Gate(GateId),
    /// An external marker whose concrete label is not yet known.
    External(ExternalKind),
    /// A concrete symbolic label (`A`, `B`, ..., `Y0`, ...).
    Label(String),
    /// The trace dead-ended and has not been classified yet.
    Unresolved,
}

/// One terminal of a gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The wire carrying this terminal.
    pub wire: WireId,
    pub role: Role,
    pub target: ConnectionTarget,
}

/// A gate in the finished netlist.
///
/// `connections[i].wire == connected_wires[i]` for every `i`, and both lists
/// hold inputs before the single output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,

    #[serde(rename = "type")]
    pub gate_type: GateType,

    pub rotation: Rotation,

    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,

    #[serde(default)]
    pub connections: Vec<Connection>,

    #[serde(default)]
    pub connected_wires: Vec<WireId>,

    /// Declared arity, `max(1, connected_wires.len() - 1)`.
    pub num_inputs: usize,
}

impl Gate {
    /// The gate's bounding box.
    pub fn bbox(&self) -> GateBox {
        GateBox::new(self.x, self.y, self.width, self.height)
    }

    /// Arity implied by a number of connected wires.
    pub fn arity_for(wire_count: usize) -> usize {
        wire_count.saturating_sub(1).max(1)
    }

    /// Returns the connections with the given role.
    pub fn connections_with_role(&self, role: Role) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.role == role)
    }
}

/// A gate terminal a wire is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalRef {
    pub gate: GateId,
    pub role: Role,
}

/// A wire: ordered waypoint polyline plus the one or two terminals it touches.
///
/// The polyline starts at the first terminal's end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub points: Vec<Point>,

    #[serde(default)]
    pub terminals: Vec<TerminalRef>,
}

impl Wire {
    /// The last two waypoints, or the only one twice for a single-point wire.
    pub fn tail_pair(&self) -> Option<[Point; 2]> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some([*only, *only]),
            [.., a, b] => Some([*a, *b]),
        }
    }
}

/// An external marker: the endpoint pair of a dead-end wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker {
    pub ends: [Point; 2],
}

impl Marker {
    /// Creates a marker from two endpoints.
    pub fn new(a: Point, b: Point) -> Self {
        Self { ends: [a, b] }
    }
}

/// A detection that was kept out of the netlist, with the reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedDetection {
    pub detection: GateDetection,
    pub reason: String,
}

/// The complete netlist for one parsed image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    pub gates: Vec<Gate>,

    /// Wire table keyed by wire id.
    #[serde(default)]
    pub wires: BTreeMap<WireId, Wire>,

    /// External input markers.
    #[serde(default)]
    pub toggles: Vec<Marker>,

    /// External output markers.
    #[serde(default)]
    pub probes: Vec<Marker>,

    /// Detections kept for diagnostics only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedDetection>,
}

impl Netlist {
    /// Looks up a gate by id.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Returns the wire's polyline oriented so it starts at the given gate's
    /// end of the wire.
    pub fn terminal_path(&self, gate: GateId, wire: &WireId) -> Option<Vec<Point>> {
        let w = self.wires.get(wire)?;
        let position = w.terminals.iter().position(|t| t.gate == gate)?;
        let mut points = w.points.clone();
        if position > 0 {
            points.reverse();
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_arity_floor() {
        assert_eq!(Gate::arity_for(0), 1);
        assert_eq!(Gate::arity_for(1), 1);
        assert_eq!(Gate::arity_for(2), 1);
        assert_eq!(Gate::arity_for(3), 2);
        assert_eq!(Gate::arity_for(5), 4);
    }

    #[test]
    fn test_tail_pair() {
        let mut wire = Wire::default();
        assert_eq!(wire.tail_pair(), None);
        wire.points = vec![Point::new(1, 1)];
        assert_eq!(wire.tail_pair(), Some([Point::new(1, 1), Point::new(1, 1)]));
        wire.points.extend([Point::new(2, 2), Point::new(3, 3)]);
        assert_eq!(wire.tail_pair(), Some([Point::new(2, 2), Point::new(3, 3)]));
    }

    #[test]
    fn test_terminal_path_orients_from_gate() {
        let mut netlist = Netlist::default();
        netlist.wires.insert(
            WireId::from("w"),
            Wire {
                points: vec![Point::new(0, 0), Point::new(40, 0)],
                terminals: vec![
                    TerminalRef {
                        gate: GateId(1),
                        role: Role::Output,
                    },
                    TerminalRef {
                        gate: GateId(2),
                        role: Role::Input,
                    },
                ],
            },
        );

        let from_first = netlist.terminal_path(GateId(1), &WireId::from("w")).unwrap();
        let from_second = netlist.terminal_path(GateId(2), &WireId::from("w")).unwrap();
        assert_eq!(from_first[0], Point::new(0, 0));
        assert_eq!(from_second[0], Point::new(40, 0));
        assert!(netlist.terminal_path(GateId(3), &WireId::from("w")).is_none());
    }

    #[test]
    fn test_connection_target_serialization() {
        let json = serde_json::to_string(&ConnectionTarget::Gate(GateId(4))).unwrap();
        assert_eq!(json, r#"{"gate":4}"#);
        let json = serde_json::to_string(&ConnectionTarget::External(ExternalKind::Toggle)).unwrap();
        assert_eq!(json, r#"{"external":"toggle"}"#);
        let json = serde_json::to_string(&ConnectionTarget::Unresolved).unwrap();
        assert_eq!(json, r#""unresolved""#);
    }

    #[test]
    fn test_detection_reads_detector_shape() {
        let json = r#"{"id": 3, "type": "OR_0", "x": 1, "y": 2, "width": 30, "height": 40, "rotation": 0}"#;
        let det: GateDetection = serde_json::from_str(json).unwrap();
        assert_eq!(det.id, GateId(3));
        assert_eq!(det.label, "OR_0");
        assert_eq!(det.bbox(), GateBox::new(1, 2, 30, 40));
        assert_eq!(det.confidence, None);
    }
}
