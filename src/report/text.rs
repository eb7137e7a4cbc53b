use crate::report::summary::Summary;

pub fn render_report_text(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("Sample Embedding Series Report\n");
    out.push_str("==============================\n\n");

    out.push_str("1. Inputs\n");
    out.push_str(&format!(
        "Samples: {} ({} records)\n",
        summary.input.samples, summary.input.n_samples
    ));
    out.push_str(&format!(
        "Coordinates: {} ({} points)\n",
        summary.input.coordinates, summary.input.n_coordinates
    ));
    out.push_str(&format!(
        "Axes: x={} y={}\n",
        summary.input.x_axis, summary.input.y_axis
    ));
    out.push_str(&format!(
        "Unresolved joins: {}\n\n",
        summary.input.on_unresolved
    ));

    out.push_str("2. Groupings\n");
    if summary.groupings.is_empty() {
        out.push_str("none\n");
    }
    for grouping in &summary.groupings {
        out.push_str(&format!(
            "{}: {} series, {} points\n",
            grouping.attribute, grouping.n_series, grouping.n_points
        ));
        for series in &grouping.series {
            out.push_str(&format!("  {}\t{}\n", series.name, series.n));
        }
        if !grouping.unmatched.is_empty() {
            out.push_str(&format!(
                "  skipped without coordinate: {}\n",
                grouping.unmatched.join(", ")
            ));
        }
        if !grouping.ambiguous.is_empty() {
            out.push_str(&format!(
                "  skipped with duplicate coordinates: {}\n",
                grouping.ambiguous.join(", ")
            ));
        }
        if grouping.unused_coordinates > 0 {
            out.push_str(&format!(
                "  coordinates without annotation: {}\n",
                grouping.unused_coordinates
            ));
        }
    }

    out
}
