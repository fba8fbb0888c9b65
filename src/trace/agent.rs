//! The wire-following agent.
//!
//! One walk starts at every terminal candidate. At each step the agent looks
//! at all skeleton pixels within the vision radius it has not already
//! consumed, moves to their centroid and checks whether it has come within
//! reach of another gate. Walks never share state, so they run on the rayon
//! pool and are gathered back in candidate order.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::ir::{GateId, PlacedGate, Point};

use super::index::SkeletonIndex;

/// Where a traced path stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathEnd {
    /// The walk came within reach of this gate.
    Gate(GateId),
    /// No unvisited pixels were left in range.
    DeadEnd,
}

/// One traced path, starting at a terminal candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TracedPath {
    pub waypoints: Vec<Point>,
    pub end: PathEnd,
}

impl TracedPath {
    /// The terminal candidate the walk started from.
    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    pub fn last(&self) -> Point {
        self.waypoints[self.waypoints.len() - 1]
    }

    pub fn is_dead_end(&self) -> bool {
        self.end == PathEnd::DeadEnd
    }

    /// Dead-ended without taking a single step.
    pub fn is_immediate_dead_end(&self) -> bool {
        self.is_dead_end() && self.waypoints.len() == 1
    }
}

/// Tuning for a walk.
#[derive(Clone, Copy, Debug)]
pub struct WalkParams {
    pub vision: f64,
    pub max_waypoints: usize,
    pub keep_every: usize,
}

/// Traces one path from every candidate of every gate.
///
/// `candidates` is index-aligned with `gates`; so is the result, with each
/// gate's paths in candidate order.
pub fn trace_wires(
    gates: &[PlacedGate],
    candidates: &[Vec<Point>],
    index: &SkeletonIndex,
    params: WalkParams,
) -> Vec<Vec<TracedPath>> {
    let jobs: Vec<(usize, Point)> = candidates
        .iter()
        .enumerate()
        .flat_map(|(owner, starts)| starts.iter().map(move |s| (owner, *s)))
        .collect();

    let walked: Vec<(usize, TracedPath)> = jobs
        .par_iter()
        .map(|&(owner, start)| {
            let path = walk(owner, start, gates, candidates, index, params);
            (owner, path)
        })
        .collect();

    let mut per_gate = vec![Vec::new(); gates.len()];
    for (owner, path) in walked {
        per_gate[owner].push(path);
    }
    per_gate
}

fn walk(
    owner: usize,
    start: Point,
    gates: &[PlacedGate],
    candidates: &[Vec<Point>],
    index: &SkeletonIndex,
    params: WalkParams,
) -> TracedPath {
    // The start pixel is already on the path; a contact point with no
    // skeleton beyond it must dead-end with a single waypoint.
    let mut visited: HashSet<Point> = HashSet::from([start]);
    let mut waypoints = vec![start];
    let mut cursor = start;

    let end = loop {
        let fresh: Vec<Point> = index
            .within(cursor, params.vision)
            .filter(|p| !visited.contains(p))
            .collect();
        let Some(centroid) = Point::centroid(&fresh) else {
            break PathEnd::DeadEnd;
        };
        visited.extend(fresh);
        cursor = centroid;
        waypoints.push(centroid);

        let reached = gates
            .iter()
            .enumerate()
            .find(|(i, g)| *i != owner && g.bbox.distance_to(cursor) < params.vision);
        if let Some((i, gate)) = reached {
            if let Some(snap) = nearest(&candidates[i], cursor) {
                waypoints.push(snap);
            }
            break PathEnd::Gate(gate.id);
        }
    };

    TracedPath {
        waypoints: compress(waypoints, params.max_waypoints, params.keep_every),
        end,
    }
}

fn nearest(points: &[Point], to: Point) -> Option<Point> {
    points.iter().copied().min_by_key(|p| p.distance_squared(to))
}

/// Thins a long path to its endpoints plus every `keep_every`-th interior
/// waypoint. Paths of at most `max_len` waypoints are returned unchanged.
pub fn compress(points: Vec<Point>, max_len: usize, keep_every: usize) -> Vec<Point> {
    if points.len() <= max_len || keep_every == 0 {
        return points;
    }
    let last = points.len() - 1;
    points
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || *i == last || i % keep_every == 0)
        .map(|(_, p)| p)
        .collect()
}
