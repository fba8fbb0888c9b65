//! Findings from checking a detections file.

use std::fmt;

use serde::Serialize;

use crate::ir::GateId;

/// Everything wrong with a detections file, in detection order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Number of detections examined.
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(checked: usize) -> Self {
        Self {
            checked,
            issues: Vec::new(),
        }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    /// Whether the file is usable: no errors, and under `strict` no
    /// warnings either.
    pub fn passes(&self, strict: bool) -> bool {
        self.error_count() == 0 && (!strict || self.warning_count() == 0)
    }

    /// Number of issues with the given code.
    pub fn count_code(&self, code: IssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Issues attached to one gate.
    pub fn for_gate(&self, gate: GateId) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.gate == Some(gate))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(
                f,
                "Validation passed: no issues found in {} detection(s)",
                self.checked
            );
        }

        writeln!(
            f,
            "Checked {} detection(s): {} error(s), {} warning(s)",
            self.checked,
            self.error_count(),
            self.warning_count()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// One finding, optionally tied to a detection.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateId>,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, gate: Option<GateId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            gate,
            message: message.into(),
        }
    }

    pub fn warning(code: IssueCode, gate: Option<GateId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            gate,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}[{:?}]", severity, self.code)?;
        if let Some(gate) = self.gate {
            write!(f, " gate {}", gate)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Parsing will work around it, but the result may suffer.
    Warning,
    /// The detection cannot be used.
    Error,
}

/// Stable identifiers for validation findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    NoDetections,
    DuplicateGateId,
    /// Zero or negative width or height.
    InvalidBoxArea,
    UnknownGateType,
    /// Rotation other than 0/90/180/270.
    InvalidRotation,
    /// Not of the form `<TYPE>_<rotation>`.
    MalformedLabel,
    BoxOutOfBounds,
    /// Probably one gate detected twice.
    OverlappingGates,
}
