//! Gate bounding boxes in XYWH pixel format.

use serde::{Deserialize, Serialize};

use super::coord::Point;

/// An axis-aligned gate box: top-left corner plus width and height.
///
/// The right edge sits at `x + width` and the bottom edge at `y + height`.
/// Like the detector output it comes from, the constructor does not reject
/// degenerate boxes; [`GateBox::is_well_formed`] lets the pipeline skip them
/// with a warning instead. Edge accessors saturate, so a box whose far edge
/// overflows `i32` never panics even before it is rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GateBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GateBox {
    /// Creates a box from its top-left corner and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns true if both dimensions are strictly positive and both far
    /// edges fit in `i32`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some()
            && self.y.checked_add(self.height).is_some()
    }

    /// Center of the box, truncated to whole pixels.
    pub fn center(&self) -> Point {
        let mid = |lo: i32, hi: i32| ((i64::from(lo) + i64::from(hi)) / 2) as i32;
        Point::new(
            mid(self.left(), self.right()),
            mid(self.top(), self.bottom()),
        )
    }

    /// Returns true if the point lies inside the box or on its border.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Distance from a point to the box: 0 inside, otherwise the Euclidean
    /// distance to the nearest edge.
    pub fn distance_to(&self, p: Point) -> f64 {
        if self.contains(p) {
            return 0.0;
        }
        let (px, py) = (i64::from(p.x), i64::from(p.y));
        let dx = (i64::from(self.left()) - px).max(0).max(px - i64::from(self.right()));
        let dy = (i64::from(self.top()) - py).max(0).max(py - i64::from(self.bottom()));
        (dx as f64).hypot(dy as f64)
    }

    /// Returns true if the pixel falls in the half-open raster region
    /// `[x, x + width) × [y, y + height)` covered by the gate glyph.
    #[inline]
    pub fn covers_pixel(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }
}

impl std::fmt::Debug for GateBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateBox")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_edges_and_center() {
        let b = GateBox::new(250, 100, 100, 200);
        assert_eq!(b.right(), 350);
        assert_eq!(b.bottom(), 300);
        assert_eq!(b.center(), Point::new(300, 200));
    }

    #[test]
    fn test_distance_inside_is_zero() {
        let b = GateBox::new(10, 10, 20, 20);
        assert_eq!(b.distance_to(Point::new(15, 15)), 0.0);
        // the right edge counts as inside for distance purposes
        assert_eq!(b.distance_to(Point::new(30, 20)), 0.0);
    }

    #[test]
    fn test_distance_outside() {
        let b = GateBox::new(10, 10, 20, 20);
        assert_eq!(b.distance_to(Point::new(6, 20)), 4.0);
        assert_eq!(b.distance_to(Point::new(33, 34)), 5.0);
    }

    #[test]
    fn test_covers_pixel_is_half_open() {
        let b = GateBox::new(10, 10, 20, 20);
        assert!(b.covers_pixel(10, 10));
        assert!(b.covers_pixel(29, 29));
        assert!(!b.covers_pixel(30, 15));
    }

    #[test]
    fn test_malformed_box() {
        assert!(GateBox::new(0, 0, 5, 5).is_well_formed());
        assert!(!GateBox::new(0, 0, 0, 5).is_well_formed());
        assert!(!GateBox::new(0, 0, 5, -1).is_well_formed());
    }

    #[test]
    fn test_box_past_i32_range_is_malformed() {
        let b = GateBox::new(2_000_000_000, 10, 500_000_000, 10);
        assert!(!b.is_well_formed());
        assert_eq!(b.right(), i32::MAX);
        assert_eq!(b.center(), Point::new(2_073_741_823, 15));
        assert!(!GateBox::new(0, i32::MAX, 5, 1).is_well_formed());
        assert!(GateBox::new(0, i32::MAX - 1, 5, 1).is_well_formed());
    }
}
