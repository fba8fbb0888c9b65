//! End-to-end parses of small synthetic sketches.

mod common;

use sketchlogic::boolean::{expressions, synthesize};
use sketchlogic::ir::{ConnectionTarget, ExternalKind, GateBox, GateDetection, GateId, Role};
use sketchlogic::netlist::classify_external;
use sketchlogic::pipeline::ParseIssueCode;
use sketchlogic::{parse_circuit, ExternalMapping, ParseOptions};

use common::{and_sketch, blank, hline, not_into_and_sketch, vline};

fn opts(mapping: ExternalMapping) -> ParseOptions {
    ParseOptions::default()
        .with_external_mapping(mapping)
        .with_wire_id_seed(7)
}

fn roles_of(netlist: &sketchlogic::ir::Netlist, id: u64) -> Vec<Role> {
    netlist
        .gate(GateId(id))
        .expect("gate present")
        .connections
        .iter()
        .map(|c| c.role)
        .collect()
}

#[test]
fn single_and_gate_conventional() {
    let (img, dets) = and_sketch();
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));
    let netlist = &outcome.netlist;

    assert_eq!(roles_of(netlist, 1), vec![Role::Input, Role::Input, Role::Output]);
    assert_eq!(netlist.wires.len(), 3);
    assert_eq!(netlist.toggles.len(), 2);
    assert_eq!(netlist.probes.len(), 1);
    assert_eq!(expressions(netlist), vec!["Y0 = (A & B)".to_string()]);
}

#[test]
fn single_and_gate_observed_swaps_markers() {
    let (img, dets) = and_sketch();
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Observed));
    let netlist = &outcome.netlist;

    assert_eq!(netlist.toggles.len(), 1);
    assert_eq!(netlist.probes.len(), 2);
    let gate = &netlist.gates[0];
    for conn in &gate.connections {
        let expected = match conn.role {
            Role::Input => ExternalKind::Probe,
            Role::Output => ExternalKind::Toggle,
        };
        assert_eq!(conn.target, ConnectionTarget::External(expected));
    }
}

#[test]
fn not_gate_feeding_and_gate() {
    let (img, dets) = not_into_and_sketch();
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));
    let netlist = &outcome.netlist;

    assert_eq!(roles_of(netlist, 1), vec![Role::Input, Role::Output]);
    assert_eq!(roles_of(netlist, 2), vec![Role::Input, Role::Input, Role::Output]);

    let not_gate = netlist.gate(GateId(1)).expect("NOT gate");
    assert_eq!(not_gate.num_inputs, 1);
    assert_eq!(
        not_gate.connections[1].target,
        ConnectionTarget::Gate(GateId(2))
    );
    let and_gate = netlist.gate(GateId(2)).expect("AND gate");
    assert_eq!(and_gate.num_inputs, 2);
    assert_eq!(
        and_gate.connections[0].target,
        ConnectionTarget::Gate(GateId(1))
    );

    assert_eq!(netlist.toggles.len(), 2);
    assert_eq!(netlist.probes.len(), 1);
    assert_eq!(expressions(netlist), vec!["Y0 = (~A & B)".to_string()]);
}

#[test]
fn merge_of_touching_gates_joins_dead_ends() {
    // Facing terminals are single contact pixels with no stroke between them.
    let mut img = blank(400, 200);
    hline(&mut img, 100, 120, 120);
    hline(&mut img, 100, 154, 154);
    hline(&mut img, 100, 10, 39);
    hline(&mut img, 100, 235, 300);
    let dets = vec![
        GateDetection::new(1u64, "NOT_0", GateBox::new(40, 70, 80, 60)),
        GateDetection::new(2u64, "NOT_0", GateBox::new(155, 70, 80, 60)),
    ];
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));
    let netlist = &outcome.netlist;

    let joined: Vec<_> = netlist
        .wires
        .values()
        .filter(|w| w.terminals.len() == 2)
        .collect();
    assert_eq!(joined.len(), 1);
    let gates: Vec<GateId> = joined[0].terminals.iter().map(|t| t.gate).collect();
    assert_eq!(gates, vec![GateId(1), GateId(2)]);
}

#[test]
fn every_wire_starts_at_its_gate() {
    let (img, dets) = not_into_and_sketch();
    let options = opts(ExternalMapping::Conventional);
    let outcome = parse_circuit(&img, &dets, &options);
    let netlist = &outcome.netlist;

    for gate in &netlist.gates {
        for wire in &gate.connected_wires {
            let path = netlist
                .terminal_path(gate.id, wire)
                .expect("wire attached to gate");
            let first = path[0];
            assert!(
                gate.bbox().distance_to(first) < options.terminal_threshold,
                "gate {} wire {} starts at {:?}",
                gate.id,
                wire,
                first
            );
        }
    }
}

#[test]
fn classification_is_idempotent_after_parse() {
    let (img, dets) = not_into_and_sketch();
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));
    let again = classify_external(&outcome.netlist, ExternalMapping::Conventional);
    assert_eq!(again, outcome.netlist);
}

#[test]
fn seeded_parses_are_identical() {
    let (img, dets) = not_into_and_sketch();
    let options = opts(ExternalMapping::Conventional);
    let a = parse_circuit(&img, &dets, &options);
    let b = parse_circuit(&img, &dets, &options);
    assert_eq!(a.netlist, b.netlist);
    assert_eq!(synthesize(&a.netlist).lines(), synthesize(&b.netlist).lines());
}

#[test]
fn gate_without_wires_reports_no_terminals() {
    let mut img = blank(200, 200);
    vline(&mut img, 190, 10, 30);
    let dets = vec![GateDetection::new(3u64, "OR_0", GateBox::new(50, 50, 60, 60))];
    let outcome = parse_circuit(&img, &dets, &ParseOptions::default());

    let gate = &outcome.netlist.gates[0];
    assert!(gate.connections.is_empty());
    assert_eq!(gate.num_inputs, 1);
    assert_eq!(outcome.report.with_code(ParseIssueCode::NoTerminals).count(), 1);
    assert!(outcome.netlist.wires.is_empty());
}

#[test]
fn unknown_label_is_skipped_and_reported() {
    let (img, mut dets) = and_sketch();
    dets.push(GateDetection::new(9u64, "FLIPFLOP_0", GateBox::new(20, 20, 10, 10)));
    let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));

    assert_eq!(outcome.netlist.gates.len(), 1);
    assert_eq!(outcome.netlist.rejected.len(), 1);
    assert_eq!(outcome.netlist.rejected[0].detection.id, GateId(9));
    assert_eq!(outcome.report.with_code(ParseIssueCode::LabelDecode).count(), 1);
    assert_eq!(expressions(&outcome.netlist), vec!["Y0 = (A & B)".to_string()]);
}
