//! Detection validation for sketchlogic.
//!
//! Checks a detections file before parsing:
//! - Structural integrity (unique ids, decodable labels)
//! - Geometric validity (positive box area, boxes within the image)
//! - Likely detector double-hits (heavily overlapping boxes)

mod report;

pub use report::{IssueCode, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use crate::error::SketchError;
use crate::ir::{decode_label, GateDetection, GateId, LabelDecodeError};

/// Overlap ratio above which two boxes are reported as the same gate.
const DUPLICATE_IOU: f64 = 0.5;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
    /// Image size to check boxes against, if known.
    pub image_size: Option<(u32, u32)>,
}

impl ValidateOptions {
    /// Reads the image size from the file header without decoding pixels.
    ///
    /// # Errors
    /// Returns an error if the header cannot be read.
    pub fn with_image(mut self, image: &Path) -> Result<Self, SketchError> {
        let size = imagesize::size(image).map_err(|source| SketchError::ImageProbe {
            path: image.to_path_buf(),
            source,
        })?;
        self.image_size = Some((size.width as u32, size.height as u32));
        Ok(self)
    }
}

/// Validates detections and returns a report of all issues found.
pub fn validate_detections(detections: &[GateDetection], opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new(detections.len());

    if detections.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::NoDetections,
            None,
            "No detections; the netlist will be empty",
        ));
        return report;
    }

    let mut seen_ids: HashMap<GateId, usize> = HashMap::new();
    for (idx, det) in detections.iter().enumerate() {
        let gate = Some(det.id);

        if let Some(first_idx) = seen_ids.get(&det.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateGateId,
                gate,
                format!("Duplicate gate ID (first seen at index {})", first_idx),
            ));
        } else {
            seen_ids.insert(det.id, idx);
        }

        if let Err(err) = decode_label(&det.label) {
            let code = match err {
                LabelDecodeError::Malformed(_) => IssueCode::MalformedLabel,
                LabelDecodeError::UnknownGateType(_) => IssueCode::UnknownGateType,
                LabelDecodeError::InvalidRotation(_) => IssueCode::InvalidRotation,
            };
            report.add(ValidationIssue::error(code, gate, err.to_string()));
        }

        let bbox = det.bbox();
        if !bbox.is_well_formed() {
            report.add(ValidationIssue::error(
                IssueCode::InvalidBoxArea,
                gate,
                format!(
                    "Box ({}, {}, {}, {}) has no area or runs past the coordinate range",
                    det.x, det.y, det.width, det.height
                ),
            ));
            continue;
        }

        if let Some((w, h)) = opts.image_size {
            let (w, h) = (i64::from(w), i64::from(h));
            let outside = bbox.left() < 0
                || bbox.top() < 0
                || i64::from(bbox.right()) > w
                || i64::from(bbox.bottom()) > h;
            if outside {
                report.add(ValidationIssue::warning(
                    IssueCode::BoxOutOfBounds,
                    gate,
                    format!(
                        "Box ({}, {}, {}, {}) extends outside the {}x{} image",
                        det.x, det.y, det.width, det.height, w, h
                    ),
                ));
            }
        }
    }

    check_overlaps(detections, &mut report);
    report
}

fn check_overlaps(detections: &[GateDetection], report: &mut ValidationReport) {
    for (i, a) in detections.iter().enumerate() {
        for b in &detections[i + 1..] {
            let ratio = iou(a, b);
            if ratio > DUPLICATE_IOU {
                report.add(ValidationIssue::warning(
                    IssueCode::OverlappingGates,
                    Some(b.id),
                    format!("Overlaps gate {} (IoU {:.2}); possibly the same gate twice", a.id, ratio),
                ));
            }
        }
    }
}

fn iou(a: &GateDetection, b: &GateDetection) -> f64 {
    let (a, b) = (a.bbox(), b.bbox());
    if !a.is_well_formed() || !b.is_well_formed() {
        return 0.0;
    }
    let overlap = |lo0: i32, hi0: i32, lo1: i32, hi1: i32| {
        (i64::from(hi0.min(hi1)) - i64::from(lo0.max(lo1))).max(0) as f64
    };
    let inter = overlap(a.left(), a.right(), b.left(), b.right())
        * overlap(a.top(), a.bottom(), b.top(), b.bottom());
    let union = f64::from(a.width) * f64::from(a.height) + f64::from(b.width) * f64::from(b.height) - inter;
    if union <= 0.0 {
        0.0
    } else {
        inter / union
    }
}
