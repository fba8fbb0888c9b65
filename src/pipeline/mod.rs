//! End-to-end parse of one sketch: detections plus raster in, netlist out.
//!
//! Stages run in a fixed order, each consuming the previous stage's output:
//! label decoding, skeleton extraction, terminal discovery, wire tracing,
//! role classification, netlist assembly and external classification.
//! Problems that only affect one gate are recorded in the [`ParseReport`]
//! and the parse carries on.

pub mod batch;
mod report;

pub use batch::{find_batch_jobs, BatchJob};
pub use report::{ParseIssue, ParseIssueCode, ParseReport, ParseStats, Severity};

use std::collections::HashSet;
use std::path::Path;

use image::GrayImage;

use crate::config::ParseOptions;
use crate::error::SketchError;
use crate::ir::{
    decode_label, io_csv, io_json, GateBox, GateDetection, GateId, Netlist, PlacedGate,
    RejectedDetection,
};
use crate::netlist::{
    assemble, assign_roles, classify_external, AssemblyParams, GapSearch, RoleIssue,
};
use crate::trace::{extract_skeleton, find_terminal_candidates, trace_wires, SkeletonIndex, WalkParams};

/// A finished parse.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    pub netlist: Netlist,
    pub report: ParseReport,
}

/// Parses a sketch from an already decoded grayscale raster.
///
/// Never fails: degenerate input yields an empty or partial netlist plus
/// report entries.
pub fn parse_circuit(
    image: &GrayImage,
    detections: &[GateDetection],
    opts: &ParseOptions,
) -> ParseOutcome {
    let mut report = ParseReport::new();
    report.stats.detections = detections.len();

    let (placed, erase, rejected) = place_gates(detections, &mut report);
    report.stats.gates = placed.len();

    let skeleton = extract_skeleton(image, &erase, opts.luminance_threshold);
    report.stats.skeleton_pixels = skeleton.len();
    tracing::debug!(pixels = skeleton.len(), "skeleton extracted");

    let index = SkeletonIndex::new(&skeleton.pixels);
    let candidates = find_terminal_candidates(
        &placed,
        &index,
        opts.terminal_threshold,
        opts.candidate_merge_radius,
    );
    for (gate, found) in placed.iter().zip(&candidates) {
        if found.is_empty() {
            report.add(ParseIssue::info(
                ParseIssueCode::NoTerminals,
                Some(gate.id),
                "no wire reaches this gate",
            ));
        }
    }
    report.stats.terminals = candidates.iter().map(Vec::len).sum();
    tracing::debug!(terminals = report.stats.terminals, "terminal candidates found");

    let paths = trace_wires(
        &placed,
        &candidates,
        &index,
        WalkParams {
            vision: opts.vision_threshold,
            max_waypoints: opts.max_path_waypoints,
            keep_every: opts.path_keep_every,
        },
    );

    let search = GapSearch {
        start: opts.inputs_gap_threshold,
        step: opts.inputs_gap_step,
        max_iterations: opts.max_role_iterations,
    };
    let roles: Vec<_> = placed
        .iter()
        .zip(&paths)
        .map(|(gate, gate_paths)| {
            let assignment = assign_roles(gate, gate_paths, search);
            if let Some(issue) = &assignment.issue {
                report_role_issue(gate.id, issue, &mut report);
            }
            assignment.roles
        })
        .collect();

    let assembled = assemble(
        &placed,
        &paths,
        &roles,
        AssemblyParams {
            merge_distance: opts.fragment_merge_distance,
            wire_id_seed: opts.wire_id_seed,
        },
    );
    let mut netlist = classify_external(&assembled, opts.external_mapping);
    netlist.rejected = rejected;

    report.stats.wires = netlist.wires.len();
    report.stats.toggles = netlist.toggles.len();
    report.stats.probes = netlist.probes.len();
    tracing::debug!(
        wires = netlist.wires.len(),
        toggles = netlist.toggles.len(),
        probes = netlist.probes.len(),
        "netlist assembled"
    );

    ParseOutcome { netlist, report }
}

/// Decodes an image file and parses it.
///
/// # Errors
/// Returns an error if the image cannot be opened or decoded.
pub fn parse_image_file(
    path: &Path,
    detections: &[GateDetection],
    opts: &ParseOptions,
) -> Result<ParseOutcome, SketchError> {
    let image = image::open(path).map_err(|source| SketchError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_circuit(&image.to_luma8(), detections, opts))
}

/// Reads detections, picking the reader from `format` (`json`, `csv`, or
/// `auto` to go by the file extension).
///
/// # Errors
/// Returns an error for unreadable files, parse failures or an unknown
/// format name.
pub fn read_detections(path: &Path, format: &str) -> Result<Vec<GateDetection>, SketchError> {
    let resolved = match format {
        "auto" => match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => "csv",
            _ => "json",
        },
        other => other,
    };
    match resolved {
        "json" => io_json::read_detections_json(path),
        "csv" => io_csv::read_detections_csv(path),
        other => Err(SketchError::UnsupportedFormat(format!(
            "'{}' (supported: auto, json, csv)",
            other
        ))),
    }
}

/// Fuzz-only entrypoint for gate placement; returns the placed gate count.
#[cfg(feature = "fuzzing")]
pub fn fuzz_place_gates(detections: &[GateDetection]) -> usize {
    let mut report = ParseReport::new();
    let (placed, _, _) = place_gates(detections, &mut report);
    placed.len()
}

/// Splits detections into gates to trace, boxes to erase and rejected
/// detections.
fn place_gates(
    detections: &[GateDetection],
    report: &mut ParseReport,
) -> (Vec<PlacedGate>, Vec<GateBox>, Vec<RejectedDetection>) {
    let mut placed = Vec::new();
    let mut erase = Vec::new();
    let mut rejected = Vec::new();
    let mut seen: HashSet<GateId> = HashSet::new();

    for det in detections {
        let bbox = det.bbox();
        if !bbox.is_well_formed() {
            tracing::warn!(gate = %det.id, width = det.width, height = det.height, "skipping malformed box");
            report.add(ParseIssue::warning(
                ParseIssueCode::MalformedBox,
                Some(det.id),
                format!(
                    "box ({}, {}, {}, {}) has no area or runs past the coordinate range; gate skipped",
                    det.x, det.y, det.width, det.height
                ),
            ));
            continue;
        }
        erase.push(bbox);

        if !seen.insert(det.id) {
            tracing::warn!(gate = %det.id, "duplicate gate id");
            report.add(ParseIssue::warning(
                ParseIssueCode::DuplicateGateId,
                Some(det.id),
                "id already used by an earlier detection; gate rejected",
            ));
            rejected.push(RejectedDetection {
                detection: det.clone(),
                reason: "duplicate gate id".to_string(),
            });
            continue;
        }

        match decode_label(&det.label) {
            Ok((gate_type, rotation)) => placed.push(PlacedGate {
                id: det.id,
                gate_type,
                rotation,
                bbox,
            }),
            Err(err) => {
                tracing::warn!(gate = %det.id, label = %det.label, error = %err, "rejecting gate");
                report.add(ParseIssue::warning(
                    ParseIssueCode::LabelDecode,
                    Some(det.id),
                    err.to_string(),
                ));
                rejected.push(RejectedDetection {
                    detection: det.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    (placed, erase, rejected)
}

fn report_role_issue(gate: GateId, issue: &RoleIssue, report: &mut ParseReport) {
    match issue {
        RoleIssue::NotTerminalCount(n) => {
            tracing::warn!(%gate, terminals = n, "NOT gate without two terminals");
            report.add(ParseIssue::warning(
                ParseIssueCode::NotTerminalCount,
                Some(gate),
                format!("NOT gate has {} terminal(s), expected 2", n),
            ));
        }
        RoleIssue::Unconverged { last_threshold } => {
            tracing::warn!(%gate, last_threshold, "input grouping did not converge");
            report.add(ParseIssue::warning(
                ParseIssueCode::UnresolvedTerminal,
                Some(gate),
                format!(
                    "input grouping did not converge (last threshold {:.0}px); most isolated terminal used as output",
                    last_threshold
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExternalMapping;
    use crate::ir::{ConnectionTarget, ExternalKind, GateType, Role};
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    fn hline(img: &mut GrayImage, y: u32, x0: u32, x1: u32) {
        for x in x0..=x1 {
            img.put_pixel(x, y, Luma([0]));
        }
    }

    fn and_sketch() -> (GrayImage, Vec<GateDetection>) {
        let mut img = blank(600, 400);
        hline(&mut img, 180, 50, 249);
        hline(&mut img, 220, 50, 249);
        hline(&mut img, 200, 350, 550);
        let dets = vec![GateDetection::new(1u64, "AND_0", GateBox::new(250, 100, 100, 200))];
        (img, dets)
    }

    fn opts(mapping: ExternalMapping) -> ParseOptions {
        ParseOptions::default()
            .with_external_mapping(mapping)
            .with_wire_id_seed(1)
    }

    #[test]
    fn test_single_gate_roles_and_markers() {
        let (img, dets) = and_sketch();
        let outcome = parse_circuit(&img, &dets, &opts(ExternalMapping::Conventional));
        let netlist = outcome.netlist;

        assert_eq!(netlist.gates.len(), 1);
        let gate = &netlist.gates[0];
        assert_eq!(gate.gate_type, GateType::And);
        assert_eq!(gate.connected_wires.len(), 3);
        assert_eq!(gate.num_inputs, 2);
        let roles: Vec<Role> = gate.connections.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![Role::Input, Role::Input, Role::Output]);
        assert_eq!(netlist.toggles.len(), 2);
        assert_eq!(netlist.probes.len(), 1);
        assert_eq!(
            gate.connections[2].target,
            ConnectionTarget::External(ExternalKind::Probe)
        );
        assert!(outcome.report.is_clean(), "{}", outcome.report);
    }

    #[test]
    fn test_empty_detections_yield_empty_netlist() {
        let (img, _) = and_sketch();
        let outcome = parse_circuit(&img, &[], &ParseOptions::default());
        assert!(outcome.netlist.gates.is_empty());
        assert!(outcome.netlist.wires.is_empty());
        assert!(outcome.netlist.toggles.is_empty());
        assert_eq!(outcome.report.stats.skeleton_pixels, 200 + 200 + 201);
    }

    #[test]
    fn test_bad_label_is_rejected_but_erased() {
        let (img, _) = and_sketch();
        let dets = vec![GateDetection::new(1u64, "AND_45", GateBox::new(250, 100, 100, 200))];
        let outcome = parse_circuit(&img, &dets, &ParseOptions::default());
        assert!(outcome.netlist.gates.is_empty());
        assert_eq!(outcome.netlist.rejected.len(), 1);
        assert_eq!(outcome.report.with_code(ParseIssueCode::LabelDecode).count(), 1);
        assert_eq!(outcome.report.stats.skeleton_pixels, 200 + 200 + 201);
    }

    #[test]
    fn test_malformed_box_is_skipped() {
        let (img, mut dets) = and_sketch();
        dets.push(GateDetection::new(2u64, "OR_0", GateBox::new(10, 10, 0, 30)));
        let outcome = parse_circuit(&img, &dets, &ParseOptions::default());
        assert_eq!(outcome.netlist.gates.len(), 1);
        assert_eq!(outcome.report.with_code(ParseIssueCode::MalformedBox).count(), 1);
        assert!(outcome.netlist.rejected.is_empty());
    }

    #[test]
    fn test_box_past_coordinate_range_is_skipped() {
        let dets = vec![GateDetection::new(1u64, "AND_0", GateBox::new(2_000_000_000, 10, 500_000_000, 10))];
        let outcome = parse_circuit(&blank(50, 50), &dets, &ParseOptions::default());
        assert!(outcome.netlist.gates.is_empty());
        assert_eq!(outcome.report.with_code(ParseIssueCode::MalformedBox).count(), 1);

        // Far edge fits exactly; the gate is placed and traced without panicking.
        let dets = vec![GateDetection::new(1u64, "AND_0", GateBox::new(i32::MAX - 10, 10, 10, 10))];
        let outcome = parse_circuit(&blank(50, 50), &dets, &ParseOptions::default());
        assert_eq!(outcome.netlist.gates.len(), 1);
        assert_eq!(outcome.report.with_code(ParseIssueCode::MalformedBox).count(), 0);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let (img, mut dets) = and_sketch();
        dets.push(GateDetection::new(1u64, "OR_0", GateBox::new(10, 10, 20, 20)));
        let outcome = parse_circuit(&img, &dets, &ParseOptions::default());
        assert_eq!(outcome.netlist.gates.len(), 1);
        assert_eq!(outcome.netlist.gates[0].gate_type, GateType::And);
        assert_eq!(outcome.report.with_code(ParseIssueCode::DuplicateGateId).count(), 1);
    }

    #[test]
    fn test_isolated_gate_has_floor_arity() {
        let img = blank(200, 200);
        let dets = vec![GateDetection::new(4u64, "XOR_180", GateBox::new(50, 50, 40, 40))];
        let outcome = parse_circuit(&img, &dets, &ParseOptions::default());
        let gate = &outcome.netlist.gates[0];
        assert!(gate.connected_wires.is_empty());
        assert_eq!(gate.num_inputs, 1);
        assert!(outcome.netlist.wires.is_empty());
        assert_eq!(outcome.report.with_code(ParseIssueCode::NoTerminals).count(), 1);
    }

    #[test]
    fn test_read_detections_rejects_unknown_format() {
        let err = read_detections(Path::new("x.json"), "yaml").unwrap_err();
        assert!(matches!(err, SketchError::UnsupportedFormat(_)));
    }
}
