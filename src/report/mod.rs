use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod figure;
pub mod summary;
pub mod text;
pub mod tsv;

use crate::model::coords::AxisSelection;
use crate::series::{JoinPolicy, SeriesBuild};
use figure::render_figure;
use summary::build_summary;
use text::render_report_text;
use tsv::write_series_tsv;

#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub tool_name: String,
    pub tool_version: String,
    pub run_mode: String,
    pub title: Option<String>,

    pub samples_path: String,
    pub coordinates_path: String,
    pub n_samples: usize,
    pub n_coordinates: usize,
    pub axes: &'a AxisSelection,
    pub policy: JoinPolicy,

    pub builds: &'a [SeriesBuild],
}

/// Writes per-attribute figures and tables plus `summary.json` and
/// `report.txt`. Returns the paths written, in write order.
pub fn write_reports(input: &ReportInput<'_>, out_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let stems = unique_stems(input.builds.iter().map(|b| b.attribute.as_str()));
    for (build, stem) in input.builds.iter().zip(stems) {

        let figure_path = out_dir.join(format!("series_{stem}.json"));
        let figure = render_figure(build, input.axes, input.title.as_deref());
        write_json(&figure_path, &figure)?;
        written.push(figure_path);

        let tsv_path = out_dir.join(format!("series_{stem}.tsv"));
        write_series_tsv(build, &tsv_path)?;
        written.push(tsv_path);
    }

    let summary = build_summary(input);
    let summary_path = out_dir.join("summary.json");
    write_json(&summary_path, &summary)?;
    written.push(summary_path);

    let report_path = out_dir.join("report.txt");
    write_text(&report_path, &render_report_text(&summary))?;
    written.push(report_path);

    for path in &written {
        crate::debug!("wrote {}", path.display());
    }
    Ok(written)
}

/// Attribute names become file name fragments; anything outside
/// `[A-Za-z0-9_-]` is replaced by `_`.
pub fn file_stem_for(attribute: &str) -> String {
    let stem: String = attribute
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "attribute".to_string()
    } else {
        stem
    }
}

/// One stem per attribute, in order. Attributes whose stems collide get
/// `_2`, `_3`, ... appended so no two groupings share an output file.
pub fn unique_stems<'s>(attributes: impl IntoIterator<Item = &'s str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for attribute in attributes {
        let base = file_stem_for(attribute);
        let mut stem = base.clone();
        let mut n = 2usize;
        while !taken.insert(stem.clone()) {
            stem = format!("{base}_{n}");
            n += 1;
        }
        if stem != base {
            crate::warn!(
                "attribute '{}' shares file name '{}'; writing as '{}'",
                attribute,
                base,
                stem
            );
        }
        out.push(stem);
    }
    out
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, value).map_err(std::io::Error::other)?;
    w.write_all(b"\n")?;
    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
