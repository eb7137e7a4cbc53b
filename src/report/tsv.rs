use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::format_f64_6;
use crate::series::SeriesBuild;

/// Long form, one row per plotted point in series then member order.
pub fn write_series_tsv(build: &SeriesBuild, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{}", ["group", "sample_id", "x", "y", "label"].join("\t"))?;
    for series in &build.series {
        let group = series.name.to_string();
        for i in 0..series.len() {
            let row = [
                group.clone(),
                series.sample_ids[i].clone(),
                format_f64_6(series.x[i]),
                format_f64_6(series.y[i]),
                series.label[i].clone(),
            ];
            writeln!(w, "{}", row.join("\t"))?;
        }
    }
    w.flush()
}
