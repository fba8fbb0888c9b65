//! Terminal candidate discovery.

use crate::ir::{PlacedGate, Point};

use super::index::SkeletonIndex;

/// Finds the skeleton pixels where wires leave each gate.
///
/// A pixel is a candidate for a gate when its distance to the gate box is
/// below `threshold`. Candidates are taken in row-major order and any pixel
/// closer than `merge_radius` to an already accepted one is dropped, so a
/// thick stroke end yields a single candidate. The result is index-aligned
/// with `gates`.
pub fn find_terminal_candidates(
    gates: &[PlacedGate],
    index: &SkeletonIndex,
    threshold: f64,
    merge_radius: f64,
) -> Vec<Vec<Point>> {
    let reach = threshold.ceil() as i32;
    gates
        .iter()
        .map(|gate| {
            let b = gate.bbox;
            let near = index
                .in_rect(
                    Point::new(b.left().saturating_sub(reach), b.top().saturating_sub(reach)),
                    Point::new(b.right().saturating_add(reach), b.bottom().saturating_add(reach)),
                )
                .into_iter()
                .filter(|p| b.distance_to(*p) < threshold);
            collapse_nearby(near, merge_radius)
        })
        .collect()
}

fn collapse_nearby(points: impl Iterator<Item = Point>, radius: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::new();
    for p in points {
        if kept.iter().all(|k| k.distance(p) >= radius) {
            kept.push(p);
        }
    }
    kept
}
