//! Layout clean-up passes for simulator export.
//!
//! Sketch coordinates are in photo pixels with jittery polylines; the
//! simulator expects gate-sized units on a grid. Each pass is a pure
//! function so callers can run any subset.

use std::collections::HashSet;

use crate::ir::{Netlist, Point, WireId};

use super::simulator::{Position, SimulatorCircuit};

/// Rescales a netlist so its first gate becomes `target` pixels in size.
///
/// Every gate takes the target size and every coordinate is scaled by the
/// same factors, truncating to whole pixels. A netlist without gates, or
/// whose first gate has no area, is returned unchanged.
pub fn scale_to_reference(netlist: &Netlist, target: (i32, i32)) -> Netlist {
    let mut out = netlist.clone();
    let Some(reference) = netlist.gates.first() else {
        return out;
    };
    if reference.width <= 0 || reference.height <= 0 {
        return out;
    }
    let sx = f64::from(target.0) / f64::from(reference.width);
    let sy = f64::from(target.1) / f64::from(reference.height);
    let scale = |p: Point| Point::new((f64::from(p.x) * sx) as i32, (f64::from(p.y) * sy) as i32);

    for gate in out.gates.iter_mut() {
        let corner = scale(Point::new(gate.x, gate.y));
        gate.x = corner.x;
        gate.y = corner.y;
        gate.width = target.0;
        gate.height = target.1;
    }
    for wire in out.wires.values_mut() {
        for p in wire.points.iter_mut() {
            *p = scale(*p);
        }
    }
    for marker in out.toggles.iter_mut().chain(out.probes.iter_mut()) {
        marker.ends = marker.ends.map(scale);
    }
    out
}

/// Drops interior wire points where the path turns by less than
/// `min_angle_deg`. Endpoints are always kept.
pub fn simplify_turns(circuit: &SimulatorCircuit, min_angle_deg: f64) -> SimulatorCircuit {
    let mut out = circuit.clone();
    for wire in out.wires.iter_mut() {
        let pts = &wire.points;
        if pts.len() <= 2 {
            continue;
        }
        let mut kept = vec![pts[0]];
        for w in pts.windows(3) {
            if turn_angle(w[0], w[1], w[2]) >= min_angle_deg {
                kept.push(w[1]);
            }
        }
        kept.push(pts[pts.len() - 1]);
        wire.points = kept;
    }
    out
}

/// Angle in degrees between segments `a→b` and `b→c`; 0 if either is
/// degenerate.
fn turn_angle(a: Position, b: Position, c: Position) -> f64 {
    let (v1x, v1y) = (b.x - a.x, b.y - a.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);
    let m1 = v1x.hypot(v1y);
    let m2 = v2x.hypot(v2y);
    if m1 == 0.0 || m2 == 0.0 {
        return 0.0;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (m1 * m2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Shifts everything so the bounding box of all coordinates is centered in
/// a `window`-sized canvas.
pub fn relocate(circuit: &SimulatorCircuit, window: (f64, f64)) -> SimulatorCircuit {
    let mut out = circuit.clone();
    let all = circuit.positions();
    if all.is_empty() {
        return out;
    }
    let (min_x, max_x) = all.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.x), hi.max(p.x))
    });
    let (min_y, max_y) = all.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.y), hi.max(p.y))
    });
    let dx = window.0 / 2.0 - (min_x + max_x) / 2.0;
    let dy = window.1 / 2.0 - (min_y + max_y) / 2.0;

    for c in out.components.iter_mut() {
        c.x += dx;
        c.y += dy;
        for t in c.terminals.iter_mut() {
            t.position.x += dx;
            t.position.y += dy;
        }
    }
    for w in out.wires.iter_mut() {
        for p in w.points.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
    }
    out
}

/// Rounds every coordinate to the nearest multiple of `grid`.
pub fn snap_to_grid(circuit: &SimulatorCircuit, grid: f64) -> SimulatorCircuit {
    let mut out = circuit.clone();
    if grid <= 0.0 {
        return out;
    }
    let snap = |v: f64| (v / grid).round() * grid;
    for c in out.components.iter_mut() {
        c.x = snap(c.x);
        c.y = snap(c.y);
        for t in c.terminals.iter_mut() {
            t.position.x = snap(t.position.x);
            t.position.y = snap(t.position.y);
        }
    }
    for w in out.wires.iter_mut() {
        for p in w.points.iter_mut() {
            p.x = snap(p.x);
            p.y = snap(p.y);
        }
    }
    out
}

/// Collapses consecutive identical points. Wires left with fewer than two
/// points are removed, along with references to them from terminals.
pub fn remove_duplicate_points(circuit: &SimulatorCircuit) -> SimulatorCircuit {
    let mut out = circuit.clone();
    for w in out.wires.iter_mut() {
        w.points.dedup();
    }
    let dropped: HashSet<WireId> = out
        .wires
        .iter()
        .filter(|w| w.points.len() < 2)
        .map(|w| w.id.clone())
        .collect();
    if dropped.is_empty() {
        return out;
    }
    for id in &dropped {
        tracing::debug!(wire = %id, "dropping wire with fewer than two distinct points");
    }
    out.wires.retain(|w| !dropped.contains(&w.id));
    for c in out.components.iter_mut() {
        for t in c.terminals.iter_mut() {
            t.connected_wire_ids.retain(|id| !dropped.contains(id));
        }
    }
    out
}

/// Drops points closer than `threshold` to the previously kept point, always
/// keeping both endpoints.
pub fn remove_close_points(circuit: &SimulatorCircuit, threshold: f64) -> SimulatorCircuit {
    let mut out = circuit.clone();
    for w in out.wires.iter_mut() {
        let pts = &w.points;
        if pts.len() <= 2 {
            continue;
        }
        let last = pts.len() - 1;
        let mut kept = vec![pts[0]];
        for (i, p) in pts.iter().enumerate().skip(1) {
            let prev = kept[kept.len() - 1];
            if i == last || p.distance(prev) >= threshold {
                kept.push(*p);
            }
        }
        w.points = kept;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::simulator::{Component, SimWire, Terminal};
    use crate::ir::{Gate, GateId, GateType, Rotation, Wire};
    use std::collections::BTreeMap;

    fn wire(id: &str, pts: &[(f64, f64)]) -> SimWire {
        SimWire {
            id: WireId::from(id),
            value: None,
            points: pts.iter().map(|&(x, y)| Position::new(x, y)).collect(),
        }
    }

    fn circuit(wires: Vec<SimWire>) -> SimulatorCircuit {
        SimulatorCircuit {
            components: Vec::new(),
            wires,
        }
    }

    fn xs(c: &SimulatorCircuit) -> Vec<(f64, f64)> {
        c.wires[0].points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_scale_to_reference() {
        let mut n = Netlist::default();
        n.gates.push(Gate {
            id: GateId(1),
            gate_type: GateType::And,
            rotation: Rotation::R0,
            x: 260,
            y: 120,
            width: 130,
            height: 120,
            connections: Vec::new(),
            connected_wires: Vec::new(),
            num_inputs: 1,
        });
        n.wires.insert(
            WireId::from("w"),
            Wire {
                points: vec![Point::new(100, 50), Point::new(131, 61)],
                terminals: Vec::new(),
            },
        );
        let scaled = scale_to_reference(&n, (65, 60));
        let g = &scaled.gates[0];
        assert_eq!((g.x, g.y, g.width, g.height), (130, 60, 65, 60));
        assert_eq!(
            scaled.wires[&WireId::from("w")].points,
            vec![Point::new(50, 25), Point::new(65, 30)]
        );
        assert_eq!(scale_to_reference(&Netlist::default(), (65, 60)), Netlist::default());
    }

    #[test]
    fn test_simplify_turns_keeps_corners() {
        let c = circuit(vec![wire(
            "w",
            &[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0), (20.0, 20.0), (21.0, 40.0)],
        )]);
        let out = simplify_turns(&c, 45.0);
        assert_eq!(xs(&out), vec![(0.0, 0.0), (20.0, 0.0), (21.0, 40.0)]);
    }

    #[test]
    fn test_relocate_centers_bounding_box() {
        let c = circuit(vec![wire("w", &[(0.0, 0.0), (100.0, 50.0)])]);
        let out = relocate(&c, (1280.0, 720.0));
        assert_eq!(xs(&out), vec![(590.0, 335.0), (690.0, 385.0)]);
    }

    #[test]
    fn test_snap_to_grid() {
        let c = circuit(vec![wire("w", &[(14.0, 16.0), (-4.0, 25.0)])]);
        let out = snap_to_grid(&c, 10.0);
        assert_eq!(xs(&out), vec![(10.0, 20.0), (0.0, 30.0)]);
    }

    #[test]
    fn test_remove_duplicates_drops_collapsed_wires() {
        let mut c = circuit(vec![
            wire("keep", &[(0.0, 0.0), (0.0, 0.0), (10.0, 0.0)]),
            wire("gone", &[(5.0, 5.0), (5.0, 5.0)]),
        ]);
        c.components.push(Component {
            kind: "AndGate".into(),
            terminals: vec![Terminal {
                position: Position::new(0.0, 0.0),
                connected_wire_ids: vec![WireId::from("gone"), WireId::from("keep")],
            }],
            input_line_count: 1,
            selection_line_count: 0,
            x: 0.0,
            y: 0.0,
            stored_states: BTreeMap::new(),
            rotation: 0.0,
            is_selected: false,
        });
        let out = remove_duplicate_points(&c);
        assert_eq!(out.wires.len(), 1);
        assert_eq!(xs(&out), vec![(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(
            out.components[0].terminals[0].connected_wire_ids,
            vec![WireId::from("keep")]
        );
    }

    #[test]
    fn test_remove_close_points_keeps_endpoints() {
        let c = circuit(vec![wire(
            "w",
            &[(0.0, 0.0), (3.0, 0.0), (12.0, 0.0), (14.0, 0.0), (15.0, 0.0)],
        )]);
        let out = remove_close_points(&c, 10.0);
        assert_eq!(xs(&out), vec![(0.0, 0.0), (12.0, 0.0), (15.0, 0.0)]);
    }
}
