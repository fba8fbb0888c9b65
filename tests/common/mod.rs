#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{GrayImage, Luma};
use sketchlogic::ir::{GateBox, GateDetection};

pub fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255]))
}

/// Draws a one-pixel horizontal stroke from `x0` to `x1` inclusive.
pub fn hline(img: &mut GrayImage, y: u32, x0: u32, x1: u32) {
    for x in x0..=x1 {
        img.put_pixel(x, y, Luma([0]));
    }
}

/// Draws a one-pixel vertical stroke from `y0` to `y1` inclusive.
pub fn vline(img: &mut GrayImage, x: u32, y0: u32, y1: u32) {
    for y in y0..=y1 {
        img.put_pixel(x, y, Luma([0]));
    }
}

/// A lone AND gate with two input stubs on the left and one output stub on
/// the right.
pub fn and_sketch() -> (GrayImage, Vec<GateDetection>) {
    let mut img = blank(600, 400);
    hline(&mut img, 180, 50, 249);
    hline(&mut img, 220, 50, 249);
    hline(&mut img, 200, 350, 550);
    let dets = vec![GateDetection::new(1u64, "AND_0", GateBox::new(250, 100, 100, 200))];
    (img, dets)
}

/// A NOT gate feeding the upper input of an AND gate. The NOT input and the
/// AND lower input end in open space, as does the AND output.
pub fn not_into_and_sketch() -> (GrayImage, Vec<GateDetection>) {
    let mut img = blank(600, 400);
    hline(&mut img, 200, 20, 99);
    hline(&mut img, 200, 180, 299);
    hline(&mut img, 160, 200, 299);
    hline(&mut img, 240, 400, 550);
    let dets = vec![
        GateDetection::new(1u64, "NOT_0", GateBox::new(100, 150, 80, 100)),
        GateDetection::new(2u64, "AND_0", GateBox::new(300, 100, 100, 200)),
    ];
    (img, dets)
}

pub fn write_png(path: &Path, img: &GrayImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    img.save(path).expect("write png file");
}

pub fn write_detections_json(path: &Path, dets: &[GateDetection]) {
    let json = serde_json::to_string_pretty(dets).expect("serialize detections");
    fs::write(path, json).expect("write detections file");
}
