//! Integer pixel coordinates.

use serde::{Deserialize, Serialize};

/// A pixel position in image space, (0, 0) being the top-left corner.
///
/// Serialized as a two-element `[x, y]` array, which is the shape both the
/// detector output and the wire tables use.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, exact in integer arithmetic.
    #[inline]
    pub fn distance_squared(&self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Integer centroid of a non-empty set of points (truncating division).
    ///
    /// Returns `None` for an empty slice.
    pub fn centroid(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as i64;
        let (sx, sy) = points.iter().fold((0i64, 0i64), |(sx, sy), p| {
            (sx + i64::from(p.x), sy + i64::from(p.y))
        });
        Some(Point::new((sx / n) as i32, (sy / n) as i32))
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[i32; 2]> for Point {
    fn from(xy: [i32; 2]) -> Self {
        Point::new(xy[0], xy[1])
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let xy = <[i32; 2]>::deserialize(deserializer)?;
        Ok(Point::from(xy))
    }
}
