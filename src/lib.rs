//! Joins per-sample annotations with embedding coordinates (typically PCA)
//! and partitions the result into one chart series per value of a chosen
//! annotation attribute.

pub mod input;
pub mod logging;
pub mod model;
pub mod report;
pub mod series;

pub use model::coords::{AxisSelection, CoordinatePoint};
pub use model::sample::{AttrValue, GroupKey, SampleRecord, SampleTable};
pub use model::series::Series;
pub use series::{JoinDiagnostics, JoinPolicy, SeriesBuild, SeriesBuilder, SeriesError, build_series};
