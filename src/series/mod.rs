pub mod builder;
pub mod index;

pub use builder::{SeriesBuilder, build_series};

use crate::model::series::Series;

/// What to do with a sample whose coordinate is missing or ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum JoinPolicy {
    #[default]
    Reject,
    Skip,
}

impl JoinPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinPolicy::Reject => "reject",
            JoinPolicy::Skip => "skip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("grouping attribute '{attribute}' is not present on any sample record")]
    InvalidGroupAttribute { attribute: String },
    #[error("sample '{sample_id}' has no matching coordinate")]
    UnresolvedJoin { sample_id: String },
    #[error("sample '{sample_id}' matches {matches} coordinates; expected exactly one")]
    DuplicateCoordinate { sample_id: String, matches: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinDiagnostics {
    /// Samples skipped for lack of a coordinate.
    pub unmatched: Vec<String>,
    /// Samples skipped because several coordinates share their id.
    pub ambiguous: Vec<String>,
    pub unused_coordinates: usize,
}

impl JoinDiagnostics {
    pub fn skipped(&self) -> usize {
        self.unmatched.len() + self.ambiguous.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuild {
    pub attribute: String,
    pub series: Vec<Series>,
    pub diagnostics: JoinDiagnostics,
}

impl SeriesBuild {
    pub fn n_points(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }
}
