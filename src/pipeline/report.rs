//! Non-fatal issues collected while parsing one image.

use std::fmt;

use serde::Serialize;

use crate::ir::GateId;

/// Everything a parse noticed but worked around.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ParseReport {
    pub issues: Vec<ParseIssue>,
    pub stats: ParseStats,
}

impl ParseReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ParseIssue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Issues with the given code.
    pub fn with_code(&self, code: ParseIssueCode) -> impl Iterator<Item = &ParseIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.stats)?;
        if self.issues.is_empty() {
            return writeln!(f, "No issues.");
        }
        writeln!(
            f,
            "{} issue(s), {} warning(s):",
            self.issues.len(),
            self.warning_count()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// Counts of what each stage produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub detections: usize,
    pub gates: usize,
    pub skeleton_pixels: usize,
    pub terminals: usize,
    pub wires: usize,
    pub toggles: usize,
    pub probes: usize,
}

impl fmt::Display for ParseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} detection(s) placed, {} skeleton pixel(s), {} terminal(s), {} wire(s), {} toggle(s), {} probe(s)",
            self.gates,
            self.detections,
            self.skeleton_pixels,
            self.terminals,
            self.wires,
            self.toggles,
            self.probes
        )
    }
}

/// One worked-around problem.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParseIssue {
    pub severity: Severity,
    pub code: ParseIssueCode,
    pub message: String,
    /// Gate the issue is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateId>,
}

impl ParseIssue {
    pub fn warning(code: ParseIssueCode, gate: Option<GateId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            gate,
        }
    }

    pub fn info(code: ParseIssueCode, gate: Option<GateId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message: message.into(),
            gate,
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Info => "INFO ",
            Severity::Warning => "WARN ",
        };
        match self.gate {
            Some(id) => write!(f, "[{}] {:?} in gate {}: {}", severity, self.code, id, self.message),
            None => write!(f, "[{}] {:?}: {}", severity, self.code, self.message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

/// Stable issue codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParseIssueCode {
    /// Box with non-positive width or height; the gate was skipped.
    MalformedBox,
    /// Label did not decode into a gate type and rotation; the gate was
    /// rejected but its box still erased.
    LabelDecode,
    /// A later detection reused an id; it was rejected.
    DuplicateGateId,
    /// A NOT gate without exactly two terminals.
    NotTerminalCount,
    /// Role grouping did not converge; the best split was used.
    UnresolvedTerminal,
    /// No wire reached the gate.
    NoTerminals,
}
