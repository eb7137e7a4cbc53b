use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub mod coords;
pub mod samples;

use flate2::read::MultiGzDecoder;

use crate::model::coords::{AxisSelection, CoordinatePoint};
use crate::model::sample::SampleTable;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Tsv,
    Json,
}

/// Format from the extension, looking through a trailing `.gz`.
pub fn detect_format(path: &Path) -> Result<TableFormat, InputError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".json") {
        Ok(TableFormat::Json)
    } else if name.ends_with(".tsv") || name.ends_with(".txt") {
        Ok(TableFormat::Tsv)
    } else {
        Err(InputError::InvalidInput(format!(
            "cannot infer table format of {} (use .tsv, .txt or .json, optionally .gz)",
            path.display()
        )))
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead + Send>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.display().to_string()));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Supplier of sample annotations.
pub trait SampleSource: Send + Sync {
    fn load_samples(&self) -> Result<SampleTable, InputError>;
}

/// Supplier of per-sample embedding coordinates.
pub trait CoordinateSource: Send + Sync {
    fn load_coordinates(&self) -> Result<CoordinateSet, InputError>;
}

#[derive(Debug, Clone)]
pub struct CoordinateSet {
    pub axes: AxisSelection,
    pub points: Vec<CoordinatePoint>,
}

#[derive(Debug, Clone)]
pub struct SampleFile {
    pub path: PathBuf,
    pub id_column: Option<String>,
}

impl SampleSource for SampleFile {
    fn load_samples(&self) -> Result<SampleTable, InputError> {
        samples::load_samples(&self.path, self.id_column.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateFile {
    pub path: PathBuf,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl CoordinateSource for CoordinateFile {
    fn load_coordinates(&self) -> Result<CoordinateSet, InputError> {
        coords::load_coordinates(&self.path, self.x.as_deref(), self.y.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct InputBundle {
    pub samples: SampleTable,
    pub coordinates: CoordinateSet,
}

/// Loads both sources concurrently and returns once both are done. Any
/// failure aborts the bundle; the sample error wins when both fail.
pub fn load_inputs(
    samples: &dyn SampleSource,
    coordinates: &dyn CoordinateSource,
) -> Result<InputBundle, InputError> {
    let (samples, coordinates) = std::thread::scope(|scope| {
        let coord_handle = scope.spawn(|| coordinates.load_coordinates());
        let samples = samples.load_samples();
        let coordinates = match coord_handle.join() {
            Ok(result) => result,
            Err(_) => Err(InputError::InvalidInput(
                "coordinate loader panicked".to_string(),
            )),
        };
        (samples, coordinates)
    });
    let samples = samples?;
    let coordinates = coordinates?;
    crate::info!(
        "loaded {} samples ({} attributes) and {} coordinates",
        samples.len(),
        samples.columns.len(),
        coordinates.points.len()
    );
    Ok(InputBundle {
        samples,
        coordinates,
    })
}

/// Case-insensitive match against the usual sample id headers.
pub(crate) fn is_id_header(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "sample" | "sample_id" | "sampleid" | "id" | "barcode"
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
