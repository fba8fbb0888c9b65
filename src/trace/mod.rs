//! Raster-side stages: skeleton extraction, terminal discovery and wire
//! tracing.

pub mod agent;
pub mod index;
pub mod skeleton;
pub mod terminals;

pub use agent::{trace_wires, PathEnd, TracedPath, WalkParams};
pub use index::SkeletonIndex;
pub use skeleton::{extract_skeleton, Mask, Skeleton};
pub use terminals::find_terminal_candidates;
