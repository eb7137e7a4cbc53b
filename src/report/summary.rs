use serde::Serialize;

use crate::report::ReportInput;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub groupings: Vec<GroupingSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub run_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    pub samples: String,
    pub coordinates: String,
    pub n_samples: usize,
    pub n_coordinates: usize,
    pub x_axis: String,
    pub y_axis: String,
    pub on_unresolved: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupingSummary {
    pub attribute: String,
    pub n_series: usize,
    pub n_points: usize,
    pub series: Vec<SeriesSize>,
    pub unmatched: Vec<String>,
    pub ambiguous: Vec<String>,
    pub unused_coordinates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSize {
    pub name: String,
    pub n: usize,
}

pub fn build_summary(input: &ReportInput<'_>) -> Summary {
    let groupings = input
        .builds
        .iter()
        .map(|build| GroupingSummary {
            attribute: build.attribute.clone(),
            n_series: build.series.len(),
            n_points: build.n_points(),
            series: build
                .series
                .iter()
                .map(|s| SeriesSize {
                    name: s.name.to_string(),
                    n: s.len(),
                })
                .collect(),
            unmatched: build.diagnostics.unmatched.clone(),
            ambiguous: build.diagnostics.ambiguous.clone(),
            unused_coordinates: build.diagnostics.unused_coordinates,
        })
        .collect();

    Summary {
        tool: ToolInfo {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
            run_mode: input.run_mode.clone(),
        },
        input: InputInfo {
            samples: input.samples_path.clone(),
            coordinates: input.coordinates_path.clone(),
            n_samples: input.n_samples,
            n_coordinates: input.n_coordinates,
            x_axis: input.axes.x.clone(),
            y_axis: input.axes.y.clone(),
            on_unresolved: input.policy.as_str(),
        },
        groupings,
    }
}
