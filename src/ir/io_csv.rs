//! CSV reader for gate detections.
//!
//! One row per detection with the header `id,type,x,y,width,height` and an
//! optional trailing `confidence` column:
//!
//! ```text
//! id,type,x,y,width,height
//! 1,AND_0,250,100,100,200
//! 2,NOT_90,100,150,80,100
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::ids::GateId;
use super::model::GateDetection;
use crate::error::SketchError;

#[derive(Debug, Deserialize)]
struct DetectionRow {
    id: u64,
    #[serde(rename = "type")]
    label: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<DetectionRow> for GateDetection {
    fn from(row: DetectionRow) -> Self {
        GateDetection {
            id: GateId::new(row.id),
            label: row.label,
            x: row.x,
            y: row.y,
            width: row.width,
            height: row.height,
            confidence: row.confidence,
        }
    }
}

/// Reads gate detections from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be read or a row fails to parse.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use sketchlogic::ir::io_csv::read_detections_csv;
///
/// let detections = read_detections_csv(Path::new("detections.csv"))?;
/// # Ok::<(), sketchlogic::SketchError>(())
/// ```
pub fn read_detections_csv(path: &Path) -> Result<Vec<GateDetection>, SketchError> {
    let file = File::open(path).map_err(SketchError::Io)?;
    let reader = BufReader::new(file);
    rows_to_detections(csv::Reader::from_reader(reader), path)
}

/// Reads gate detections from a CSV string.
///
/// Useful for testing without file I/O.
pub fn detections_from_csv_str(csv_str: &str) -> Result<Vec<GateDetection>, SketchError> {
    detections_from_csv_slice(csv_str.as_bytes())
}

/// Reads gate detections from CSV bytes.
pub fn detections_from_csv_slice(bytes: &[u8]) -> Result<Vec<GateDetection>, SketchError> {
    rows_to_detections(csv::Reader::from_reader(bytes), Path::new("<bytes>"))
}

fn rows_to_detections<R: std::io::Read>(
    mut csv_reader: csv::Reader<R>,
    path: &Path,
) -> Result<Vec<GateDetection>, SketchError> {
    let mut detections = Vec::new();
    for result in csv_reader.deserialize() {
        let row: DetectionRow = result.map_err(|source| SketchError::DetectionsCsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        detections.push(row.into());
    }
    Ok(detections)
}
