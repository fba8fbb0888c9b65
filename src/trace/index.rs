//! Spatial index over skeleton pixels.

use rstar::{RTree, AABB};

use crate::ir::Point;

/// R-tree over skeleton pixels supporting radius and rectangle queries.
pub struct SkeletonIndex {
    tree: RTree<[i32; 2]>,
}

impl SkeletonIndex {
    /// Bulk-loads the index from skeleton pixels.
    pub fn new(pixels: &[Point]) -> Self {
        let points = pixels.iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Pixels within `radius` of `center`, border included. Unordered.
    pub fn within(&self, center: Point, radius: f64) -> impl Iterator<Item = Point> + '_ {
        let max_d2 = (radius * radius).floor() as i32;
        self.tree
            .locate_within_distance([center.x, center.y], max_d2)
            .map(|p| Point::new(p[0], p[1]))
    }

    /// Pixels inside the inclusive rectangle `[min, max]`, row-major.
    pub fn in_rect(&self, min: Point, max: Point) -> Vec<Point> {
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        let mut hits: Vec<Point> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|p| Point::new(p[0], p[1]))
            .collect();
        hits.sort_unstable_by_key(|p| (p.y, p.x));
        hits
    }
}

impl std::fmt::Debug for SkeletonIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkeletonIndex")
            .field("pixels", &self.len())
            .finish()
    }
}
