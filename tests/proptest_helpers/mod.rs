#![allow(dead_code)]

use image::{GrayImage, Luma};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use sketchlogic::ir::{GateBox, GateDetection};

pub const CANVAS_W: u32 = 320;
pub const CANVAS_H: u32 = 240;

/// Fixed gate slots so generated boxes never overlap.
const SLOTS: [(i32, i32); 3] = [(30, 30), (170, 30), (100, 140)];
const LABELS: [&str; 10] = [
    "AND_0", "OR_90", "NOT_0", "NOT_180", "NAND_270", "NOR_0", "XOR_90", "XNOR_180", "AND_270",
    "OR_0",
];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(32);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 256;
    config
}

/// A straight one-pixel stroke.
#[derive(Clone, Debug)]
pub enum Stroke {
    Horizontal { y: u32, x0: u32, x1: u32 },
    Vertical { x: u32, y0: u32, y1: u32 },
}

/// A generated sketch: gate detections plus the strokes to draw.
#[derive(Clone, Debug)]
pub struct SketchCase {
    pub detections: Vec<GateDetection>,
    pub strokes: Vec<Stroke>,
}

impl SketchCase {
    pub fn render(&self) -> GrayImage {
        let mut img = GrayImage::from_pixel(CANVAS_W, CANVAS_H, Luma([255]));
        for stroke in &self.strokes {
            match *stroke {
                Stroke::Horizontal { y, x0, x1 } => {
                    for x in x0.min(x1)..=x0.max(x1) {
                        img.put_pixel(x, y, Luma([0]));
                    }
                }
                Stroke::Vertical { x, y0, y1 } => {
                    for y in y0.min(y1)..=y0.max(y1) {
                        img.put_pixel(x, y, Luma([0]));
                    }
                }
            }
        }
        img
    }
}

fn arb_stroke() -> BoxedStrategy<Stroke> {
    prop_oneof![
        (0..CANVAS_H, 0..CANVAS_W, 0..CANVAS_W)
            .prop_map(|(y, x0, x1)| Stroke::Horizontal { y, x0, x1 }),
        (0..CANVAS_W, 0..CANVAS_H, 0..CANVAS_H)
            .prop_map(|(x, y0, y1)| Stroke::Vertical { x, y0, y1 }),
    ]
    .boxed()
}

fn arb_gate(slot: usize) -> BoxedStrategy<GateDetection> {
    let (sx, sy) = SLOTS[slot];
    (0..LABELS.len(), 30..60i32, 30..70i32)
        .prop_map(move |(label, w, h)| {
            GateDetection::new(slot as u64 + 1, LABELS[label], GateBox::new(sx, sy, w, h))
        })
        .boxed()
}

/// One to three gates in fixed slots and up to eight random strokes.
pub fn arb_sketch() -> BoxedStrategy<SketchCase> {
    (1..=SLOTS.len())
        .prop_flat_map(|n| {
            let gates: Vec<BoxedStrategy<GateDetection>> = (0..n).map(arb_gate).collect();
            (gates, prop::collection::vec(arb_stroke(), 0..8))
        })
        .prop_map(|(detections, strokes)| SketchCase {
            detections,
            strokes,
        })
        .boxed()
}
