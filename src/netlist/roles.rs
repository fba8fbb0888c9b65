//! Input/output role classification of a gate's traced paths.

use crate::ir::{GateType, PlacedGate, Point, Role};
use crate::trace::TracedPath;

/// Something about a gate's terminals that needed a heuristic fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum RoleIssue {
    /// A NOT gate without exactly two terminals.
    NotTerminalCount(usize),
    /// The gap-threshold search never isolated a single output; the most
    /// isolated terminal was chosen instead.
    Unconverged { last_threshold: f64 },
}

/// Roles for one gate's paths, index-aligned with the paths.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleAssignment {
    pub roles: Vec<Role>,
    pub issue: Option<RoleIssue>,
}

/// Parameters of the input-grouping search.
#[derive(Clone, Copy, Debug)]
pub struct GapSearch {
    pub start: f64,
    pub step: f64,
    pub max_iterations: usize,
}

/// Decides which of a gate's paths are inputs and which one is the output.
///
/// NOT gates: the first path that reached another gate is the output. When
/// every path dead-ends the one starting farthest from the box center wins.
///
/// Other gates: terminals whose start points lie closer than a growing gap
/// threshold to a sibling are inputs; the threshold grows until exactly one
/// terminal is left over, and that one is the output.
pub fn assign_roles(gate: &PlacedGate, paths: &[TracedPath], search: GapSearch) -> RoleAssignment {
    if paths.is_empty() {
        return RoleAssignment {
            roles: Vec::new(),
            issue: None,
        };
    }
    let starts: Vec<Point> = paths.iter().map(TracedPath::start).collect();

    if gate.gate_type == GateType::Not {
        let output = paths
            .iter()
            .position(|p| !p.is_dead_end())
            .unwrap_or_else(|| farthest_from(gate.bbox.center(), &starts));
        let issue = (paths.len() != 2).then_some(RoleIssue::NotTerminalCount(paths.len()));
        return RoleAssignment {
            roles: single_output(paths.len(), output),
            issue,
        };
    }

    match group_inputs(&starts, search) {
        Ok(is_input) => RoleAssignment {
            roles: is_input
                .into_iter()
                .map(|input| if input { Role::Input } else { Role::Output })
                .collect(),
            issue: None,
        },
        Err(last_threshold) => RoleAssignment {
            roles: single_output(paths.len(), most_isolated(gate.bbox.center(), &starts)),
            issue: Some(RoleIssue::Unconverged { last_threshold }),
        },
    }
}

/// Runs the growing-threshold search. On failure returns the last threshold
/// tried.
fn group_inputs(starts: &[Point], search: GapSearch) -> Result<Vec<bool>, f64> {
    let wanted = starts.len() - 1;
    let diameter = pairs(starts.len())
        .map(|(i, j)| starts[i].distance(starts[j]))
        .fold(0.0, f64::max);

    let mut threshold = search.start;
    for _ in 0..search.max_iterations {
        let mut is_input = vec![false; starts.len()];
        for (i, j) in pairs(starts.len()) {
            if starts[i].distance(starts[j]) < threshold {
                is_input[i] = true;
                is_input[j] = true;
            }
        }
        if is_input.iter().filter(|v| **v).count() == wanted {
            return Ok(is_input);
        }
        if threshold > diameter {
            break;
        }
        threshold += search.step;
    }
    Err(threshold)
}

fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

fn single_output(n: usize, output: usize) -> Vec<Role> {
    (0..n)
        .map(|i| if i == output { Role::Output } else { Role::Input })
        .collect()
}

fn farthest_from(center: Point, starts: &[Point]) -> usize {
    let mut best = 0;
    for (i, p) in starts.iter().enumerate() {
        if p.distance_squared(center) > starts[best].distance_squared(center) {
            best = i;
        }
    }
    best
}

/// The terminal with the largest distance to its nearest sibling; ties go to
/// the one farther from the center, then to the lower index.
fn most_isolated(center: Point, starts: &[Point]) -> usize {
    let gap = |i: usize| {
        starts
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.distance_squared(starts[i]))
            .min()
            .unwrap_or(0)
    };
    let mut best = 0;
    let mut best_key = (gap(0), starts[0].distance_squared(center));
    for i in 1..starts.len() {
        let key = (gap(i), starts[i].distance_squared(center));
        if key > best_key {
            best = i;
            best_key = key;
        }
    }
    best
}
