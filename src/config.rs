//! Tunable parse options.
//!
//! The geometric thresholds encode assumptions about sketch density and
//! stroke scale, not algorithmic invariants. They all live here so they can
//! be calibrated from a YAML file without touching the pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SketchError;

/// How unresolved wire ends are turned into external markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalMapping {
    /// Input-role dead ends become probes, output-role dead ends become
    /// toggles. This is the mapping the heuristic has always produced, even
    /// though it runs against the usual meaning of the two markers.
    #[default]
    Observed,
    /// Input-role dead ends become toggles, output-role dead ends become
    /// probes.
    Conventional,
}

/// Options for a single parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Grayscale values at or below this are foreground strokes.
    pub luminance_threshold: u8,
    /// Maximum distance (exclusive) from a gate box for a skeleton pixel to
    /// count as a terminal candidate.
    pub terminal_threshold: f64,
    /// Candidates closer than this to an accepted candidate are dropped.
    pub candidate_merge_radius: f64,
    /// Radius of each tracing step, and the distance at which the walker
    /// considers another gate reached.
    pub vision_threshold: f64,
    /// Paths longer than this many waypoints are thinned.
    pub max_path_waypoints: usize,
    /// Interior waypoint stride kept when thinning a path.
    pub path_keep_every: usize,
    /// Two immediately dead-ended terminals of different gates closer than
    /// this are joined into one wire.
    pub fragment_merge_distance: f64,
    /// Starting pairwise distance below which terminals are grouped as inputs.
    pub inputs_gap_threshold: f64,
    /// Growth of the input grouping distance per retry.
    pub inputs_gap_step: f64,
    /// Upper bound on input grouping retries.
    pub max_role_iterations: usize,
    /// Toggle/probe assignment for dead ends.
    pub external_mapping: ExternalMapping,
    /// Seed for wire id generation; `None` draws from the thread RNG.
    pub wire_id_seed: Option<u64>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            luminance_threshold: 127,
            terminal_threshold: 5.0,
            candidate_merge_radius: 10.0,
            vision_threshold: 10.0,
            max_path_waypoints: 15,
            path_keep_every: 5,
            fragment_merge_distance: 50.0,
            inputs_gap_threshold: 100.0,
            inputs_gap_step: 25.0,
            max_role_iterations: 64,
            external_mapping: ExternalMapping::Observed,
            wire_id_seed: None,
        }
    }
}

impl ParseOptions {
    /// Loads options from a YAML file; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SketchError> {
        let data = fs::read_to_string(path).map_err(SketchError::Io)?;
        serde_yaml::from_str(&data).map_err(|source| SketchError::ConfigYamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses options from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Sets the external marker mapping.
    pub fn with_external_mapping(mut self, mapping: ExternalMapping) -> Self {
        self.external_mapping = mapping;
        self
    }

    /// Fixes the wire id seed so repeated parses produce identical ids.
    pub fn with_wire_id_seed(mut self, seed: u64) -> Self {
        self.wire_id_seed = Some(seed);
        self
    }
}
