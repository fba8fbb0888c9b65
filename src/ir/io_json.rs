//! JSON serialization for detections and netlists.
//!
//! Detections are accepted either as a bare array or wrapped in the
//! detector formatter's `{"filename": ..., "annotations": [...]}` record.
//! Netlists round-trip through the serde representation of [`Netlist`].

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Deserialize;

use super::model::{GateDetection, Netlist};
use crate::error::SketchError;

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionsDocument {
    List(Vec<GateDetection>),
    Record {
        #[allow(dead_code)]
        #[serde(default)]
        filename: Option<String>,
        annotations: Vec<GateDetection>,
    },
}

impl DetectionsDocument {
    fn into_detections(self) -> Vec<GateDetection> {
        match self {
            DetectionsDocument::List(list) => list,
            DetectionsDocument::Record { annotations, .. } => annotations,
        }
    }
}

/// Reads gate detections from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_detections_json(path: &Path) -> Result<Vec<GateDetection>, SketchError> {
    let file = File::open(path).map_err(SketchError::Io)?;
    let reader = BufReader::new(file);

    let doc: DetectionsDocument =
        serde_json::from_reader(reader).map_err(|source| SketchError::DetectionsJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(doc.into_detections())
}

/// Reads gate detections from a JSON string.
///
/// Useful for testing without file I/O.
pub fn detections_from_json_str(json: &str) -> Result<Vec<GateDetection>, serde_json::Error> {
    detections_from_json_slice(json.as_bytes())
}

/// Reads gate detections from JSON bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn detections_from_json_slice(bytes: &[u8]) -> Result<Vec<GateDetection>, serde_json::Error> {
    let doc: DetectionsDocument = serde_json::from_slice(bytes)?;
    Ok(doc.into_detections())
}

/// Reads a netlist from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_netlist_json(path: &Path) -> Result<Netlist, SketchError> {
    let file = File::open(path).map_err(SketchError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SketchError::NetlistJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a netlist to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_netlist_json(path: &Path, netlist: &Netlist) -> Result<(), SketchError> {
    let file = File::create(path).map_err(SketchError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, netlist).map_err(|source| SketchError::NetlistJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a netlist from a JSON string.
pub fn netlist_from_json_str(json: &str) -> Result<Netlist, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a netlist from JSON bytes.
pub fn netlist_from_json_slice(bytes: &[u8]) -> Result<Netlist, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a netlist to a pretty-printed JSON string.
pub fn netlist_to_json_string(netlist: &Netlist) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        Connection, ConnectionTarget, Gate, GateId, GateType, Marker, Point, Role, Rotation,
        TerminalRef, Wire, WireId,
    };

    fn sample_netlist() -> Netlist {
        let mut netlist = Netlist::default();
        netlist.gates.push(Gate {
            id: GateId(1),
            gate_type: GateType::Nand,
            rotation: Rotation::R90,
            x: 10,
            y: 20,
            width: 30,
            height: 40,
            connections: vec![Connection {
                wire: WireId::from("w1"),
                role: Role::Output,
                target: ConnectionTarget::Unresolved,
            }],
            connected_wires: vec![WireId::from("w1")],
            num_inputs: 1,
        });
        netlist.wires.insert(
            WireId::from("w1"),
            Wire {
                points: vec![Point::new(40, 40), Point::new(90, 40)],
                terminals: vec![TerminalRef {
                    gate: GateId(1),
                    role: Role::Output,
                }],
            },
        );
        netlist
            .toggles
            .push(Marker::new(Point::new(40, 40), Point::new(90, 40)));
        netlist
    }

    #[test]
    fn test_detections_bare_list() {
        let json = r#"[{"id": 1, "type": "AND_0", "x": 0, "y": 0, "width": 10, "height": 10}]"#;
        let dets = detections_from_json_str(json).unwrap();
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].label, "AND_0");
    }

    #[test]
    fn test_detections_annotation_record() {
        let json = r#"{
            "filename": "example.jpg",
            "annotations": [
                {"id": 1, "type": "NOT_90", "x": 5, "y": 6, "width": 7, "height": 8, "rotation": 0},
                {"id": 2, "type": "OR_0", "x": 50, "y": 6, "width": 7, "height": 8, "rotation": 0}
            ]
        }"#;
        let dets = detections_from_json_str(json).unwrap();
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[1].id, GateId(2));
    }

    #[test]
    fn test_detections_reject_garbage() {
        assert!(detections_from_json_str("{\"nope\": 1}").is_err());
    }

    #[test]
    fn test_netlist_json_roundtrip() {
        let original = sample_netlist();
        let json = netlist_to_json_string(&original).expect("serialization failed");
        let restored = netlist_from_json_str(&json).expect("deserialization failed");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_netlist_json_format() {
        let json = netlist_to_json_string(&sample_netlist()).unwrap();
        assert!(json.contains("\"type\": \"NAND\""));
        assert!(json.contains("\"rotation\": 90"));
        assert!(json.contains("\"connected_wires\""));
        assert!(json.contains("\"num_inputs\": 1"));
        assert!(!json.contains("\"rejected\""));
    }
}
