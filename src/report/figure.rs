use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

use crate::model::coords::AxisSelection;
use crate::series::SeriesBuild;

/// Plotly figure: `{data, layout}`.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub customdata: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
    pub hovermode: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
    pub zeroline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

pub fn render_figure(build: &SeriesBuild, axes: &AxisSelection, title: Option<&str>) -> Figure {
    let colors = generate_palette(build.series.len());
    let data = build
        .series
        .iter()
        .zip(colors)
        .map(|(series, color)| Trace {
            kind: "scatter",
            mode: "markers",
            name: series.name.to_string(),
            x: series.x.clone(),
            y: series.y.clone(),
            text: series.label.clone(),
            customdata: series.sample_ids.clone(),
            marker: Marker { color, size: 8 },
        })
        .collect();

    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} vs {} by {}", axes.y, axes.x, build.attribute));
    Figure {
        data,
        layout: Layout {
            title: Title { text: title },
            xaxis: Axis {
                title: Title {
                    text: axes.x.clone(),
                },
                zeroline: false,
            },
            yaxis: Axis {
                title: Title {
                    text: axes.y.clone(),
                },
                zeroline: false,
            },
            legend: Legend {
                title: Title {
                    text: build.attribute.clone(),
                },
            },
            hovermode: "closest",
        },
    }
}

/// `n` evenly spaced hues as `#rrggbb`.
pub fn generate_palette(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/figure.rs"]
mod tests;
