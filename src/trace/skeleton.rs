//! Trace extraction: binarize, thin to a 1-pixel skeleton, erase gate glyphs.

use image::GrayImage;

use crate::ir::{GateBox, Point};

/// A binary foreground mask, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// Creates an all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Thresholds a grayscale image: pixels at or below `threshold` are
    /// foreground (dark ink on light paper).
    pub fn from_luma(image: &GrayImage, threshold: u8) -> Self {
        let data = image.as_raw().iter().map(|&v| v <= threshold).collect();
        Self {
            width: image.width(),
            height: image.height(),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reads a pixel; anything outside the mask is background.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Writes a pixel; writes outside the mask are ignored.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, value: bool) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }

    /// Thins the foreground to a topology-preserving 1-pixel skeleton
    /// (Zhang-Suen), iterating until no pixel changes.
    pub fn thin(&mut self) {
        loop {
            let first = self.thinning_pass(Subiteration::First);
            let second = self.thinning_pass(Subiteration::Second);
            if first == 0 && second == 0 {
                break;
            }
        }
    }

    /// Clears every pixel covered by the gate box.
    pub fn erase_box(&mut self, bbox: &GateBox) {
        let x0 = i64::from(bbox.left()).max(0);
        let y0 = i64::from(bbox.top()).max(0);
        let x1 = i64::from(bbox.right()).min(i64::from(self.width));
        let y1 = i64::from(bbox.bottom()).min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, false);
            }
        }
    }

    /// Foreground pixels in row-major order.
    pub fn pixels(&self) -> Vec<Point> {
        let w = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| Point::new((i % w) as i32, (i / w) as i32))
            .collect()
    }

    /// Neighbours P2..P9, clockwise from north.
    fn neighbours(&self, x: i64, y: i64) -> [bool; 8] {
        [
            self.get(x, y - 1),
            self.get(x + 1, y - 1),
            self.get(x + 1, y),
            self.get(x + 1, y + 1),
            self.get(x, y + 1),
            self.get(x - 1, y + 1),
            self.get(x - 1, y),
            self.get(x - 1, y - 1),
        ]
    }

    fn thinning_pass(&mut self, step: Subiteration) -> usize {
        let mut doomed = Vec::new();
        let w = i64::from(self.width);

        for (idx, _) in self.data.iter().enumerate().filter(|(_, v)| **v) {
            let (x, y) = (idx as i64 % w, idx as i64 / w);
            let n = self.neighbours(x, y);

            let filled = n.iter().filter(|v| **v).count();
            if !(2..=6).contains(&filled) {
                continue;
            }
            let transitions = (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count();
            if transitions != 1 {
                continue;
            }

            let (p2, p4, p6, p8) = (n[0], n[2], n[4], n[6]);
            let removable = match step {
                Subiteration::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
                Subiteration::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
            };
            if removable {
                doomed.push(idx);
            }
        }

        for &idx in &doomed {
            self.data[idx] = false;
        }
        doomed.len()
    }
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("foreground", &self.count())
            .finish()
    }
}

#[derive(Clone, Copy)]
enum Subiteration {
    First,
    Second,
}

/// The trace skeleton of one image, with gate regions already erased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skeleton {
    pub width: u32,
    pub height: u32,
    /// Foreground pixels, row-major.
    pub pixels: Vec<Point>,
}

impl Skeleton {
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }
}

/// Extracts the wire skeleton from a grayscale raster.
///
/// Thinning runs before erasure so a stroke that touches a gate keeps its
/// shape right up to the box edge.
pub fn extract_skeleton(image: &GrayImage, gate_boxes: &[GateBox], threshold: u8) -> Skeleton {
    let mut mask = Mask::from_luma(image, threshold);
    mask.thin();
    for bbox in gate_boxes {
        mask.erase_box(bbox);
    }
    Skeleton {
        width: mask.width(),
        height: mask.height(),
        pixels: mask.pixels(),
    }
}
