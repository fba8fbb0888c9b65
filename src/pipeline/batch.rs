//! Directory discovery for batch parsing.
//!
//! Every image under the root with a sibling `<stem>.detections.json` (or
//! `.csv`) becomes one job. Images without detections are skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SketchError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// One image to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchJob {
    pub image: PathBuf,
    pub detections: PathBuf,
}

impl BatchJob {
    /// File stem of the image, used to name outputs.
    pub fn stem(&self) -> String {
        self.image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Finds parse jobs under `root`, sorted by image path.
///
/// # Errors
/// Returns an error if the directory cannot be walked.
pub fn find_batch_jobs(root: &Path) -> Result<Vec<BatchJob>, SketchError> {
    let mut jobs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| SketchError::DirectoryWalk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }
        match sibling_detections(entry.path()) {
            Some(detections) => jobs.push(BatchJob {
                image: entry.path().to_path_buf(),
                detections,
            }),
            None => {
                tracing::info!(image = %entry.path().display(), "no detections file; skipping");
            }
        }
    }
    Ok(jobs)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

fn sibling_detections(image: &Path) -> Option<PathBuf> {
    let stem = image.file_stem()?.to_str()?;
    ["json", "csv"]
        .iter()
        .map(|ext| image.with_file_name(format!("{stem}.detections.{ext}")))
        .find(|candidate| candidate.is_file())
}
