//! Turns unresolved wire ends into toggle and probe markers.

use crate::config::ExternalMapping;
use crate::ir::{ConnectionTarget, ExternalKind, Marker, Netlist, Role, Wire};

/// Marker kind for a dead end with the given role.
pub fn external_kind(role: Role, mapping: ExternalMapping) -> ExternalKind {
    match (mapping, role) {
        (ExternalMapping::Observed, Role::Input) => ExternalKind::Probe,
        (ExternalMapping::Observed, Role::Output) => ExternalKind::Toggle,
        (ExternalMapping::Conventional, Role::Input) => ExternalKind::Toggle,
        (ExternalMapping::Conventional, Role::Output) => ExternalKind::Probe,
    }
}

/// Classifies every [`ConnectionTarget::Unresolved`] terminal as a toggle or
/// a probe and records a marker at the wire's loose end.
///
/// Markers are appended in gate order, then connection order, and never
/// duplicated. Connections that already have a target are left alone, so
/// running this on its own output changes nothing.
pub fn classify_external(netlist: &Netlist, mapping: ExternalMapping) -> Netlist {
    let mut out = netlist.clone();
    for gate in out.gates.iter_mut() {
        for conn in gate.connections.iter_mut() {
            if conn.target != ConnectionTarget::Unresolved {
                continue;
            }
            let kind = external_kind(conn.role, mapping);
            conn.target = ConnectionTarget::External(kind);

            let Some([a, b]) = netlist.wires.get(&conn.wire).and_then(Wire::tail_pair) else {
                continue;
            };
            let marker = Marker::new(a, b);
            let markers = match kind {
                ExternalKind::Toggle => &mut out.toggles,
                ExternalKind::Probe => &mut out.probes,
            };
            if !markers.contains(&marker) {
                markers.push(marker);
            }
        }
    }
    out
}
